//! Templating facilities.

use axum::response::IntoResponse;
use tracing::error;

/// Render a template into an Axum response.
pub trait RenderIntoResponse: Sized {
    /// Render the template into a response, or into an error response if rendering fails.
    fn try_render_into_response(
        self,
    ) -> Result<axum::response::Response, axum::response::Response>;

    /// Render the template into a response.
    ///
    /// Rendering failures yield an internal server error response.
    fn render_into_response(self) -> axum::response::Response {
        match self.try_render_into_response() {
            Ok(response) | Err(response) => response,
        }
    }
}

impl<T: askama::Template> RenderIntoResponse for T {
    fn try_render_into_response(
        self,
    ) -> Result<axum::response::Response, axum::response::Response> {
        match self.render() {
            Ok(body) => {
                let mut headers = http::HeaderMap::new();
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("text/html; charset=utf-8"),
                );

                Ok((http::StatusCode::OK, headers, body).into_response())
            }
            Err(err) => {
                error!(
                    "Failed to render template `{}`: {err}",
                    std::any::type_name::<T>()
                );

                Err(http::StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}
