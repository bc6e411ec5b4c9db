use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use shared::types::{ServiceDetails, ServiceSummary};
use crate::store::{Action, Store, Ticket};
use crate::transport::{fetch_json, Transport};

/// Issues API requests and reports their outcome to the [`Store`].
/// Requests run as detached tasks; a superseded request still completes on
/// the wire but its outcome is discarded.
#[derive(Clone)]
pub struct ServicesClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    store: Arc<Store>,
}

impl ServicesClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, store: Arc<Store>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            store,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn request_list(&self) -> JoinHandle<()> {
        let ticket = self.store.begin(Action::ListRequested);
        self.spawn_fetch(
            ticket,
            self.base_url.clone(),
            Action::ListSucceeded as fn(Vec<ServiceSummary>) -> Action,
            Action::ListFailed,
        )
    }

    pub fn request_details(&self, id: &str) -> JoinHandle<()> {
        let ticket = self.store.begin(Action::DetailsRequested { id: id.to_string() });
        self.spawn_fetch(
            ticket,
            self.details_url(id),
            Action::DetailsSucceeded as fn(ServiceDetails) -> Action,
            Action::DetailsFailed,
        )
    }

    /// `id` becomes exactly one path segment, percent-encoded
    fn details_url(&self, id: &str) -> String {
        let Ok(mut url) = reqwest::Url::parse(&self.base_url) else {
            // Unparseable base; the request itself will report the failure
            return format!("{}/{}", self.base_url, id);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url.into()
    }

    fn spawn_fetch<T>(
        &self,
        ticket: Ticket,
        url: String,
        on_success: fn(T) -> Action,
        on_failure: fn(String) -> Action,
    ) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            tracing::debug!("GET {}", url);
            let outcome = match fetch_json::<T>(transport.as_ref(), &url).await {
                Ok(data) => on_success(data),
                Err(e) => {
                    tracing::warn!("GET {} failed: {}", url, e);
                    on_failure(e.to_string())
                }
            };

            if !store.complete(ticket, outcome) {
                tracing::debug!("Dropped superseded response for {}", url);
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use tokio::sync::oneshot;
    use crate::error::FetchError;
    use crate::transport::HttpResponse;

    pub(crate) const BASE: &str = "http://localhost:7070/api/services";

    type Reply = Result<HttpResponse, FetchError>;

    /// Each call to `get` takes the next gate and waits until the test opens it
    #[derive(Default)]
    pub(crate) struct GatedTransport {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        urls: Mutex<Vec<String>>,
    }

    impl GatedTransport {
        pub(crate) fn with_gates(n: usize) -> (Arc<Self>, Vec<oneshot::Sender<Reply>>) {
            let transport = Arc::new(Self::default());
            let mut senders = Vec::with_capacity(n);
            {
                let mut gates = transport.gates.lock().unwrap();
                for _ in 0..n {
                    let (tx, rx) = oneshot::channel();
                    senders.push(tx);
                    gates.push_back(rx);
                }
            }
            (transport, senders)
        }

        pub(crate) fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }

        /// Yield until `n` calls have reached the transport
        pub(crate) async fn wait_for_calls(&self, n: usize) {
            while self.urls.lock().unwrap().len() < n {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
            self.urls.lock().unwrap().push(url.to_string());
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(gate) => gate
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
                None => Err(FetchError::Transport("no scripted response".to_string())),
            }
        }
    }

    pub(crate) fn ok(body: &str) -> Reply {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn client(transport: Arc<GatedTransport>) -> ServicesClient {
        ServicesClient::new(transport, BASE, Arc::new(Store::new()))
    }

    const LIST_A: &str = r#"[{"id":1,"name":"Замена стекла","price":21000}]"#;
    const LIST_B: &str = r#"[{"id":2,"name":"Замена дисплея","price":25000}]"#;

    #[tokio::test]
    async fn test_list_success() {
        let (transport, mut gates) = GatedTransport::with_gates(1);
        let client = client(Arc::clone(&transport));

        let handle = client.request_list();
        assert!(client.store().list().loading);

        gates.remove(0).send(ok(LIST_A)).unwrap();
        handle.await.unwrap();

        let list = client.store().list();
        assert!(!list.loading);
        assert!(list.error.is_none());
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "Замена стекла");
        assert_eq!(transport.urls(), vec![BASE.to_string()]);
    }

    #[tokio::test]
    async fn test_list_transport_rejection() {
        let (transport, mut gates) = GatedTransport::with_gates(1);
        let client = client(transport);

        let handle = client.request_list();
        gates
            .remove(0)
            .send(Err(FetchError::Transport("connection refused".to_string())))
            .unwrap();
        handle.await.unwrap();

        let list = client.store().list();
        assert!(!list.loading);
        assert!(list.error.is_some());
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let (transport, mut gates) = GatedTransport::with_gates(1);
        let client = client(Arc::clone(&transport));

        let handle = client.request_details("999");
        gates
            .remove(0)
            .send(Ok(HttpResponse { status: 404, body: "null".to_string() }))
            .unwrap();
        handle.await.unwrap();

        let details = client.store().details();
        assert_eq!(details.error.as_deref(), Some("HTTP error! status: 404"));
        assert!(details.item.is_none());
        assert_eq!(transport.urls(), vec![format!("{}/999", BASE)]);
    }

    #[tokio::test]
    async fn test_latest_wins_when_first_resolves_last() {
        let (transport, mut gates) = GatedTransport::with_gates(2);
        let client = client(Arc::clone(&transport));

        let first = client.request_list();
        transport.wait_for_calls(1).await;
        let second = client.request_list();
        transport.wait_for_calls(2).await;

        let first_gate = gates.remove(0);
        let second_gate = gates.remove(0);

        second_gate.send(ok(LIST_B)).unwrap();
        second.await.unwrap();
        first_gate.send(ok(LIST_A)).unwrap();
        first.await.unwrap();

        let list = client.store().list();
        assert!(!list.loading);
        assert_eq!(list.items[0].id, 2);
    }

    #[tokio::test]
    async fn test_superseded_failure_does_not_end_loading() {
        let (transport, mut gates) = GatedTransport::with_gates(2);
        let client = client(Arc::clone(&transport));

        let first = client.request_details("1");
        transport.wait_for_calls(1).await;
        let second = client.request_details("2");
        transport.wait_for_calls(2).await;

        gates
            .remove(0)
            .send(Err(FetchError::Status(500)))
            .unwrap();
        first.await.unwrap();

        let details = client.store().details();
        assert!(details.loading, "the newer request is still in flight");
        assert!(details.error.is_none());

        gates
            .remove(0)
            .send(ok(r#"{"id":2,"name":"Замена дисплея","price":25000,"content":"Дисплей оригинал от Foxconn"}"#))
            .unwrap();
        second.await.unwrap();

        let details = client.store().details();
        assert!(!details.loading);
        assert_eq!(details.item.map(|item| item.id), Some(2));
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let (transport, mut gates) = GatedTransport::with_gates(2);
        let client = client(transport);

        let handle = client.request_list();
        gates.remove(0).send(Err(FetchError::Status(500))).unwrap();
        handle.await.unwrap();
        assert!(client.store().list().error.is_some());

        let handle = client.request_list();
        let list = client.store().list();
        assert!(list.loading);
        assert!(list.error.is_none());

        gates.remove(0).send(ok(LIST_A)).unwrap();
        handle.await.unwrap();
        assert_eq!(client.store().list().items.len(), 1);
    }

    #[test]
    fn test_details_id_is_one_path_segment() {
        let (transport, _) = GatedTransport::with_gates(0);
        let client = client(transport);

        assert_eq!(client.details_url("1"), format!("{}/1", BASE));
        assert_eq!(client.details_url("1?"), format!("{}/1%3F", BASE));
        assert_eq!(client.details_url("1#x"), format!("{}/1%23x", BASE));
        assert_eq!(client.details_url("a/b"), format!("{}/a%2Fb", BASE));
    }

    #[tokio::test]
    async fn test_details_query_char_is_not_stripped() {
        let (transport, mut gates) = GatedTransport::with_gates(1);
        let client = client(Arc::clone(&transport));

        let handle = client.request_details("1?");
        gates
            .remove(0)
            .send(Ok(HttpResponse { status: 404, body: "null".to_string() }))
            .unwrap();
        handle.await.unwrap();

        assert_eq!(transport.urls(), vec![format!("{}/1%3F", BASE)]);
        assert!(client.store().details().item.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let (transport, _) = GatedTransport::with_gates(0);
        let client = ServicesClient::new(transport, format!("{}/", BASE), Arc::new(Store::new()));
        assert_eq!(client.base_url, BASE);
    }
}
