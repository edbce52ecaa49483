use std::sync::Arc;

use axum::extract::FromRequestParts;
use tracing::warn;

/// A controller that adds caching strategy support to another controller.
pub struct Controller<C: crate::Controller> {
    pub controller: C,
    pub cache: Arc<super::Cache<C::Route>>,
}

impl<C: crate::Controller> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<C> crate::Controller for Controller<C>
where
    C: crate::Controller<Response = Result<axum::response::Response, axum::response::Response>>,
    C::Route: FromRequestParts<Self>,
{
    type Route = C::Route;
    type Response = C::Response;

    async fn handle_request(
        &self,
        route: Self::Route,
        parts: http::request::Parts,
        server_info: &crate::ServerInfo,
    ) -> Self::Response {
        let cache_control = self.cache.get_cache_control(&route, &parts);
        let url = route.to_string();
        let response = match self
            .controller
            .handle_request(route, parts, server_info)
            .await
        {
            Ok(response) | Err(response) => response,
        };

        self.cache
            .check_cache_control(cache_control, response)
            .await
            .inspect_err(|_| warn!("Cache control failed for route: {url}"))
    }
}

/// An extension trait for controllers that adds caching strategy support.
pub trait ControllerExt: crate::Controller {
    fn with_cache(self, cache: super::Cache<Self::Route>) -> Controller<Self>
    where
        Self: Sized;
}

impl<C: crate::Controller> ControllerExt for C {
    fn with_cache(self, cache: super::Cache<C::Route>) -> Controller<Self> {
        let cache = Arc::new(cache);

        Controller {
            controller: self,
            cache,
        }
    }
}
