//! API server state

use std::sync::Arc;

use crate::api::routes::Endpoint;
use crate::service::ThoughtService;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Thought service wrapping the store handle opened at startup
    pub service: Arc<ThoughtService>,

    /// Route manifest served at `/`
    pub endpoints: Arc<Vec<Endpoint>>,
}

impl AppState {
    pub fn new(service: Arc<ThoughtService>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            service,
            endpoints: Arc::new(endpoints),
        }
    }
}
