//! Route registration with a manifest for introspection

use axum::http::Method;
use axum::routing::MethodRouter;
use axum::Router;
use serde::Serialize;

use crate::api::AppState;

/// One registered path, in the shape `GET /` reports it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub methods: Vec<String>,
    pub middlewares: Vec<String>,
}

/// Router builder that records every route it registers
pub struct RouteTable {
    router: Router<AppState>,
    endpoints: Vec<Endpoint>,
    middlewares: Vec<String>,
}

impl RouteTable {
    /// `middlewares` names the layers wrapped around every route.
    pub fn new(middlewares: &[&str]) -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
            middlewares: middlewares.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn route(mut self, path: &str, methods: &[Method], handler: MethodRouter<AppState>) -> Self {
        self.router = self.router.route(path, handler);

        let methods = methods.iter().map(|m| m.as_str().to_string());
        match self.endpoints.iter_mut().find(|e| e.path == path) {
            Some(endpoint) => {
                for method in methods {
                    if !endpoint.methods.contains(&method) {
                        endpoint.methods.push(method);
                    }
                }
            }
            None => self.endpoints.push(Endpoint {
                path: path.to_string(),
                methods: methods.collect(),
                middlewares: self.middlewares.clone(),
            }),
        }

        self
    }

    /// Registration order is preserved in the manifest.
    pub fn finish(self) -> (Router<AppState>, Vec<Endpoint>) {
        (self.router, self.endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};

    async fn noop() {}

    #[test]
    fn test_manifest_merges_methods_per_path() {
        let (_router, endpoints) = RouteTable::new(&["cors", "json"])
            .route("/", &[Method::GET], get(noop))
            .route("/items", &[Method::GET], get(noop))
            .route("/items", &[Method::POST], post(noop))
            .finish();

        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].path, "/");
        assert_eq!(endpoints[1].path, "/items");
        assert_eq!(endpoints[1].methods, vec!["GET", "POST"]);
        assert_eq!(endpoints[1].middlewares, vec!["cors", "json"]);
    }
}
