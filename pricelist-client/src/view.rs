use std::fmt::Write;
use tokio::task::JoinHandle;
use crate::client::ServicesClient;
use crate::error::readable_message;
use crate::store::{DetailsState, ListState, ServicesState};

const RUB: &str = "₽";
const GROUP_SEPARATOR: char = '\u{a0}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/:id/details`; the id is passed through unparsed
    Details(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        if path == "/" {
            return Route::List;
        }

        let Some(rest) = path.strip_prefix('/') else {
            return Route::NotFound;
        };
        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [id, "details"] if !id.is_empty() => Route::Details(id.to_string()),
            _ => Route::NotFound,
        }
    }
}

/// Russian-locale amount: digits grouped by three with a no-break space from
/// five digits up, followed by the currency symbol when one is given.
pub fn format_currency(value: u64, symbol: &str) -> String {
    let digits = value.to_string();
    let grouped = if digits.len() < 5 {
        digits
    } else {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
            out.push(ch);
        }
        out
    };

    if symbol.is_empty() {
        grouped
    } else {
        format!("{} {}", grouped, symbol)
    }
}

fn render_loading() -> String {
    "Loading...\n".to_string()
}

fn render_error(raw: &str) -> String {
    format!(
        "An error occurred\n{}\n[r] Retry the request\n",
        readable_message(raw)
    )
}

pub fn render_list(state: &ListState) -> String {
    let mut out = String::from("Services\n\n");

    if state.loading {
        out.push_str(&render_loading());
    }
    if let Some(error) = &state.error {
        out.push_str(&render_error(error));
    }
    if state.loading || state.error.is_some() {
        return out;
    }

    if state.items.is_empty() {
        out.push_str("The service list is empty\n");
        return out;
    }

    for item in &state.items {
        let _ = writeln!(
            out,
            "  {}  {}  -> /{}/details",
            item.name,
            format_currency(item.price, RUB),
            item.id
        );
    }
    out
}

pub fn render_details(state: &DetailsState) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str(&render_loading());
    }
    if let Some(error) = &state.error {
        out.push_str(&render_error(error));
    }
    if state.loading || state.error.is_some() {
        return out;
    }

    if let Some(item) = &state.item {
        let _ = writeln!(out, "Service:\n{}\n", item.name);
        let _ = writeln!(out, "Price: {}", format_currency(item.price, RUB));
        let _ = writeln!(out, "Description: {}\n", item.content);
        let _ = writeln!(out, "Link: /{}/details", item.id);
        out.push_str("-> / Home\n");
    }
    out
}

pub fn render_not_found() -> String {
    "Page not found\n-> / Home\n".to_string()
}

/// The current page and the client that feeds it
pub struct App {
    route: Route,
    client: ServicesClient,
}

impl App {
    pub fn new(client: ServicesClient) -> Self {
        Self {
            route: Route::NotFound,
            client,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Switch pages and issue the request the new page needs on mount
    pub fn navigate(&mut self, path: &str) -> Option<JoinHandle<()>> {
        self.route = Route::parse(path);
        tracing::debug!("Navigated to {:?}", self.route);
        self.retry()
    }

    /// Re-issue the current page's request
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        match &self.route {
            Route::List => Some(self.client.request_list()),
            Route::Details(id) => Some(self.client.request_details(id)),
            Route::NotFound => None,
        }
    }

    pub fn render(&self, state: &ServicesState) -> String {
        match &self.route {
            Route::List => render_list(&state.list),
            Route::Details(_) => render_details(&state.details),
            Route::NotFound => render_not_found(),
        }
    }
}
