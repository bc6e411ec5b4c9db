use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use shared::types::{ServiceDetails, ServiceSummary};

/// Requests for the same resource class supersede one another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    List,
    Details,
}

/// The only ways state changes
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ListRequested,
    ListSucceeded(Vec<ServiceSummary>),
    ListFailed(String),
    DetailsRequested { id: String },
    DetailsSucceeded(ServiceDetails),
    DetailsFailed(String),
}

impl Action {
    pub fn resource(&self) -> Resource {
        match self {
            Action::ListRequested | Action::ListSucceeded(_) | Action::ListFailed(_) => Resource::List,
            Action::DetailsRequested { .. }
            | Action::DetailsSucceeded(_)
            | Action::DetailsFailed(_) => Resource::Details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub items: Vec<ServiceSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub item: Option<ServiceDetails>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicesState {
    pub list: ListState,
    pub details: DetailsState,
}

impl ServicesState {
    /// Reducer. A failure keeps previously loaded data; only the error is set.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ListRequested => {
                self.list.loading = true;
                self.list.error = None;
            }
            Action::ListSucceeded(items) => {
                self.list.loading = false;
                self.list.error = None;
                self.list.items = items;
            }
            Action::ListFailed(error) => {
                self.list.loading = false;
                self.list.error = Some(error);
            }
            Action::DetailsRequested { .. } => {
                self.details.loading = true;
                self.details.error = None;
            }
            Action::DetailsSucceeded(item) => {
                self.details.loading = false;
                self.details.error = None;
                self.details.item = Some(item);
            }
            Action::DetailsFailed(error) => {
                self.details.loading = false;
                self.details.error = Some(error);
            }
        }
    }
}

/// Identifies one in-flight request. Only the latest ticket per resource may
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

/// Holds [`ServicesState`] and notifies subscribers on every applied change.
pub struct Store {
    tx: watch::Sender<ServicesState>,
    list_seq: AtomicU64,
    details_seq: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ServicesState::default());
        Self {
            tx,
            list_seq: AtomicU64::new(0),
            details_seq: AtomicU64::new(0),
        }
    }

    fn seq(&self, resource: Resource) -> &AtomicU64 {
        match resource {
            Resource::List => &self.list_seq,
            Resource::Details => &self.details_seq,
        }
    }

    /// Apply a "requested" action and issue a ticket that supersedes every
    /// earlier one for the same resource.
    pub fn begin(&self, requested: Action) -> Ticket {
        let resource = requested.resource();
        let mut seq = 0;
        // Counters only move under the channel's write lock
        self.tx.send_modify(|state| {
            seq = self.seq(resource).fetch_add(1, Ordering::Relaxed) + 1;
            state.apply(requested);
        });
        Ticket { resource, seq }
    }

    /// Apply a terminal action if `ticket` is still the latest for its
    /// resource. Returns false when the outcome was dropped as stale.
    pub fn complete(&self, ticket: Ticket, outcome: Action) -> bool {
        debug_assert_eq!(ticket.resource, outcome.resource());
        self.tx.send_if_modified(|state| {
            if self.seq(ticket.resource).load(Ordering::Relaxed) != ticket.seq {
                return false;
            }
            state.apply(outcome);
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ServicesState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ServicesState {
        self.tx.borrow().clone()
    }

    pub fn list(&self) -> ListState {
        self.tx.borrow().list.clone()
    }

    pub fn details(&self) -> DetailsState {
        self.tx.borrow().details.clone()
    }
}
