//! The controller trait.

use std::future::Future;

/// The controller trait is responsible for rendering views in an application, based on a given
/// route.
///
/// A controller is cloned into the router state and invoked once per request. It should hold no
/// per-request state: anything request-scoped travels through the route and the request parts.
///
/// # Example
///
/// ```rust,ignore
/// impl Controller for HomeController {
///     type Route = HomeRoute;
///     type Response = Result<axum::response::Response, axum::response::Response>;
///
///     async fn handle_request(
///         &self,
///         route: Self::Route,
///         parts: http::request::Parts,
///         server_info: &ServerInfo,
///     ) -> Self::Response {
///         match route {
///             HomeRoute::Index => self.index(),
///             HomeRoute::Edit { id } => self.edit(id),
///         }
///         .try_render_into_response()
///     }
/// }
/// ```
///
/// Root controllers that directly serve HTTP responses use
/// `Result<axum::response::Response, axum::response::Response>` as their `Response` type.
pub trait Controller: Send + Sync + Clone {
    /// The route type associated with the controller.
    ///
    /// The route is extracted from the request parts before the controller is invoked: requests
    /// that do not match any route are rejected by the extractor and never reach the controller.
    type Route: super::Route
        + Send
        + 'static
        + axum::extract::FromRequestParts<Self>;

    /// The response type for this controller.
    type Response: Send + 'static;

    /// Handle the request for a given route.
    fn handle_request(
        &self,
        route: Self::Route,
        parts: http::request::Parts,
        server_info: &super::ServerInfo,
    ) -> impl Future<Output = Self::Response> + Send;
}
