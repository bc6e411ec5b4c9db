use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use shared::protocol::SERVICES_PATH;
use shared::types::ServiceDetails;
use crate::catalog::{parse_id, Catalog};
use crate::simulator::{deliver, ResponseSimulator, SimulatedFailure};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub simulator: Arc<dyn ResponseSimulator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SERVICES_PATH, get(list_services))
        .route(&format!("{}/:id", SERVICES_PATH), get(get_service))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_services(State(state): State<AppState>) -> Result<Response, SimulatedFailure> {
    let body = state.catalog.list_all();
    deliver(state.simulator.as_ref(), StatusCode::OK, body).await
}

async fn get_service(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, SimulatedFailure> {
    match parse_id(&raw_id).and_then(|id| state.catalog.get_by_id(id)) {
        Some(record) => deliver(state.simulator.as_ref(), StatusCode::OK, record).await,
        None => {
            tracing::debug!("No service with id {:?}", raw_id);
            deliver(state.simulator.as_ref(), StatusCode::NOT_FOUND, None::<&ServiceDetails>).await
        }
    }
}
