use crate::models::health::HealthResponse;
use async_graphql::{Context, Object, Result};

/// GraphQL view of [`HealthResponse`].
#[derive(Debug)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

impl From<HealthResponse> for Health {
    fn from(response: HealthResponse) -> Self {
        Self {
            status: response.status,
            version: response.version,
            timestamp: response.timestamp,
        }
    }
}

#[Object]
impl Health {
    /// "UP" while the service is running
    async fn status(&self) -> &str {
        &self.status
    }

    /// Crate version of the running service
    async fn version(&self) -> &str {
        &self.version
    }

    /// RFC 3339 timestamp in UTC
    async fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

#[derive(Default)]
pub struct HealthQuery;

#[Object]
impl HealthQuery {
    /// Checks service health status
    async fn health(&self, _ctx: &Context<'_>) -> Result<Health> {
        Ok(Health::from(HealthResponse::up()))
    }
}
