use std::time::Duration;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use anyhow::Result;
use rand::Rng;
use serde::Serialize;
use shared::protocol::SIMULATED_FAILURE_BODY;
use crate::config::SimulatorConfig;

/// What happens to a single response: how long it is held back and whether
/// it is dropped in favour of a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub delay: Duration,
    pub fails: bool,
}

/// Strategy deciding the fate of each response. One plan is drawn per request.
pub trait ResponseSimulator: Send + Sync {
    fn plan(&self) -> Plan;
}

/// Uniform delay in `[min, max]` and an independent failure draw
#[derive(Debug, Clone)]
pub struct RandomSimulator {
    min_delay_ms: u64,
    max_delay_ms: u64,
    failure_rate: f64,
}

impl RandomSimulator {
    pub fn new(config: &SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
            failure_rate: config.failure_rate,
        })
    }
}

impl ResponseSimulator for RandomSimulator {
    fn plan(&self) -> Plan {
        let mut rng = rand::thread_rng();
        let delay_ms = rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        let fails = rng.gen_bool(self.failure_rate);
        Plan {
            delay: Duration::from_millis(delay_ms),
            fails,
        }
    }
}

/// No delay, never fails
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Reliable;

#[cfg(test)]
impl ResponseSimulator for Reliable {
    fn plan(&self) -> Plan {
        Plan {
            delay: Duration::ZERO,
            fails: false,
        }
    }
}

/// No delay, always fails
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFails;

#[cfg(test)]
impl ResponseSimulator for AlwaysFails {
    fn plan(&self) -> Plan {
        Plan {
            delay: Duration::ZERO,
            fails: true,
        }
    }
}

/// A response lost to a simulated network fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedFailure;

impl IntoResponse for SimulatedFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, SIMULATED_FAILURE_BODY).into_response()
    }
}

/// Hold the response back for the planned delay, then either send `body`
/// with `status` or report a simulated failure. No retry.
pub async fn deliver<T: Serialize>(
    simulator: &dyn ResponseSimulator,
    status: StatusCode,
    body: T,
) -> Result<Response, SimulatedFailure> {
    let plan = simulator.plan();
    if !plan.delay.is_zero() {
        tokio::time::sleep(plan.delay).await;
    }

    if plan.fails {
        tracing::warn!("Simulated failure after {:?} (would have been {})", plan.delay, status);
        return Err(SimulatedFailure);
    }

    tracing::debug!("Delivering {} after {:?}", status, plan.delay);
    Ok((status, Json(body)).into_response())
}
