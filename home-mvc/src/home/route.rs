//! The routes of the Home controller.

use std::{fmt::Display, str::FromStr};

use axum::{extract::FromRequestParts, response::IntoResponse};
use http::request::Parts;

use crate::{ParseError, Route, decode_path_argument};

/// The name of the controller segment.
const CONTROLLER: &str = "Home";

/// The routes of the Home controller.
///
/// URLs follow the conventional `{controller=Home}/{action=Index}/{id?}` pattern, with segments
/// matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRoute {
    /// The index page.
    Index,

    /// The edit page for a given identifier.
    Edit {
        /// The identifier, passed as-is to the view.
        id: i32,
    },
}

/// The query string accepted by the edit action.
#[derive(Debug, Default, serde::Deserialize)]
struct EditQuery {
    #[serde(default, alias = "Id", alias = "ID")]
    id: Option<String>,
}

impl HomeRoute {
    /// Check whether the route accepts the given method.
    pub fn accepts(&self, method: &http::Method) -> bool {
        *method == self.method() || *method == http::Method::HEAD
    }

    fn parse_edit(url: &str, id: Option<&str>, query: Option<&str>) -> Result<Self, ParseError> {
        if let Some(id) = id {
            let id = decode_path_argument("id", id)?;

            return Ok(Self::Edit { id });
        }

        // Form decoding already percent-decodes the query value.
        let query: EditQuery = match query {
            Some(query) => serde_html_form::from_str(query).map_err(|err| {
                ParseError::QueryStringParse {
                    error: err.to_string(),
                }
            })?,
            None => EditQuery::default(),
        };

        let Some(value) = query.id else {
            tracing::debug!("No identifier found in `{url}`.");

            return Err(ParseError::MissingPathParam {
                param_name: "id".to_string(),
            });
        };

        let id = value
            .parse()
            .map_err(|err: std::num::ParseIntError| ParseError::PathParamParse {
                param_name: "id".to_string(),
                value: value.clone(),
                error: err.to_string(),
            })?;

        Ok(Self::Edit { id })
    }
}

impl Display for HomeRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index => write!(f, "/{CONTROLLER}/Index"),
            Self::Edit { id } => write!(f, "/{CONTROLLER}/Edit/{id}"),
        }
    }
}

impl Route for HomeRoute {
    fn method(&self) -> http::Method {
        http::Method::GET
    }
}

impl FromStr for HomeRoute {
    type Err = ParseError;

    /// Parse a route from a URL path, with an optional query string.
    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        let no_match = || ParseError::NoMatchingRoute {
            url: url.to_string(),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let (controller, action, id) = match segments.as_slice() {
            [] => (CONTROLLER, "Index", None),
            [controller] => (*controller, "Index", None),
            [controller, action] => (*controller, *action, None),
            [controller, action, id] => (*controller, *action, Some(*id)),
            _ => return Err(no_match()),
        };

        if !controller.eq_ignore_ascii_case(CONTROLLER) {
            return Err(no_match());
        }

        if action.eq_ignore_ascii_case("Index") {
            Ok(Self::Index)
        } else if action.eq_ignore_ascii_case("Edit") {
            Self::parse_edit(url, id, query)
        } else {
            Err(no_match())
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for HomeRoute {
    type Rejection = axum::response::Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let url = parts
            .uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or_else(|| parts.uri.path());

        let route: Self = url.parse().map_err(IntoResponse::into_response)?;

        if !route.accepts(&parts.method) {
            return Err(ParseError::MethodNotAllowed {
                url: url.to_string(),
                method: parts.method.clone(),
            }
            .into_response());
        }

        Ok(route)
    }
}
