mod agents;
mod client;
mod mock;

pub use agents::AgentsApi;
pub use client::{HealthStatus, HubClient, NO_RESPONSE};
pub use mock::MockAgentsApi;
