use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use anyhow::{Context, Result};
use shared::protocol::DEFAULT_API_BASE_URL;
use pricelist_client::client::ServicesClient;
use pricelist_client::store::Store;
use pricelist_client::transport::HttpTransport;
use pricelist_client::view::App;

const HELP: &str = "Commands: <path> to navigate (/, /:id/details), r to retry, q to quit";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the rendered page
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pricelist_client=warn"))
        )
        .with_writer(std::io::stderr)
        .init();

    let base_url = std::env::var("PRICELIST_API_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    tracing::info!("Using API at {}", base_url);

    let transport = HttpTransport::new().context("Failed to build HTTP client")?;
    let store = Arc::new(Store::new());
    let client = ServicesClient::new(Arc::new(transport), base_url, Arc::clone(&store));
    let mut app = App::new(client);
    let mut state_rx = store.subscribe();

    println!("{}", HELP);
    app.navigate("/");
    let state = state_rx.borrow_and_update().clone();
    println!("{}", app.render(&state));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                println!("{}", app.render(&state));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "q" => break,
                    "r" => {
                        app.retry();
                    }
                    "" => {
                        println!("[{:?}]\n{}", app.route(), app.render(&store.snapshot()));
                    }
                    path => {
                        app.navigate(path);
                        let state = state_rx.borrow_and_update().clone();
                        println!("{}", app.render(&state));
                    }
                }
            }
        }
    }

    Ok(())
}
