use std::sync::Arc;

use axum::{Extension, Router, extract::State, response::IntoResponse};

use crate::Controller;

use super::ServerInfo;

/// A router that is associated to a controller.
///
/// Every request is handed to the controller's route extractor: requests that don't match any
/// route are rejected by it.
#[derive(Debug, Clone, Default)]
pub struct ControllerRouter(Router);

impl ControllerRouter {
    /// Create a new controller router from a controller.
    pub fn new<C>(controller: C) -> Self
    where
        C: Controller + 'static,
        C::Response: IntoResponse,
    {
        let router = Router::new()
            .fallback(
                |State(controller): State<C>,
                 Extension(server_info): Extension<Arc<ServerInfo>>,
                 route: C::Route,
                 parts: http::request::Parts| async move {
                    controller.handle_request(route, parts, &server_info).await
                },
            )
            .with_state(controller);

        Self(router)
    }

    /// Turn the controller router into a plain router, making the server information available to
    /// the controller.
    pub fn into_router(self, server_info: Arc<ServerInfo>) -> Router {
        self.0.layer(Extension(server_info))
    }
}
