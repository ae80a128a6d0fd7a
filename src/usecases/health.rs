use crate::domain::events::ServerHealth;

use super::contracts::GatewayError;

const HEALTHY_STATUS: &str = "healthy";

pub trait HealthProbe {
    /// Returns the `status` string reported by the backend.
    fn health(&self) -> Result<String, GatewayError>;
}

impl<T: HealthProbe + ?Sized> HealthProbe for &T {
    fn health(&self) -> Result<String, GatewayError> {
        (*self).health()
    }
}

pub fn check_health(probe: &dyn HealthProbe) -> ServerHealth {
    match probe.health() {
        Ok(status) if status == HEALTHY_STATUS => ServerHealth::Healthy,
        Ok(status) => {
            tracing::warn!(status = %status, "backend reported unexpected health status");
            ServerHealth::Unreachable
        }
        Err(error) => {
            tracing::warn!(error = %error, "backend health probe failed");
            ServerHealth::Unreachable
        }
    }
}
