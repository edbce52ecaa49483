//! Error types for route parsing.

use axum::response::IntoResponse;

/// Error that can occur when parsing a route from a URL or a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The URL doesn't match any known route pattern.
    #[error("no matching route found for URL: {url}")]
    NoMatchingRoute { url: String },

    /// The URL matches a route, but not with the request method.
    #[error("URL '{url}' does not accept the {method} method")]
    MethodNotAllowed { url: String, method: http::Method },

    /// Failed to parse a path parameter.
    #[error("failed to parse path parameter '{param_name}' from '{value}': {error}")]
    PathParamParse {
        param_name: String,
        value: String,
        error: String,
    },

    /// Failed to parse the query string.
    #[error("failed to parse query string: {error}")]
    QueryStringParse { error: String },

    /// A path parameter was missing from the URL.
    #[error("missing required path parameter: {param_name}")]
    MissingPathParam { param_name: String },
}

impl ParseError {
    /// The HTTP status code associated with the error.
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::NoMatchingRoute { .. } => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::PathParamParse { .. }
            | Self::QueryStringParse { .. }
            | Self::MissingPathParam { .. } => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ParseError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        tracing::debug!("Rejecting request with status {status}: {self}");

        let mut response = (status, self.to_string()).into_response();

        if let Self::MethodNotAllowed { .. } = self {
            response.headers_mut().insert(
                http::header::ALLOW,
                http::HeaderValue::from_static("GET, HEAD"),
            );
        }

        response
    }
}
