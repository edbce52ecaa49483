//! Caching utilities.
//!
//! Responses are tagged with an `ETag` computed from their body, so that clients revalidating a
//! page they already have get a `304 Not Modified` instead of the full page.

mod controller;

use std::{collections::BTreeSet, marker::PhantomData, time::Duration};

use axum::response::IntoResponse;
pub use controller::{Controller, ControllerExt};
use md5::{Digest, Md5};
use tracing::{error, warn};

use crate::Route;

/// The default maximum body size.
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MB

/// The default caching duration.
const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60);

/// A caching strategy.
pub struct Cache<R> {
    max_body_size: usize,
    cache_duration: Duration,
    _phantom: PhantomData<fn() -> R>,
}

impl<R> Default for Cache<R> {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            cache_duration: DEFAULT_CACHE_DURATION,
            _phantom: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for Cache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("max_body_size", &self.max_body_size)
            .field("cache_duration", &self.cache_duration)
            .finish()
    }
}

impl<R> Cache<R> {
    /// Set the maximum size of a body that can be hashed.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Set the cache duration.
    pub fn with_cache_duration(mut self, cache_duration: Duration) -> Self {
        self.cache_duration = cache_duration;
        self
    }
}

impl<R: Route> Cache<R> {
    /// Get the cache control for a request.
    pub fn get_cache_control(&self, route: &R, parts: &http::request::Parts) -> CacheControl {
        let _ = route;

        for cache_control_directive in parts
            .headers
            .get_all(http::header::CACHE_CONTROL)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
        {
            // Only the `no-cache` and `max-age=0` directives are honored.
            if cache_control_directive.eq_ignore_ascii_case("no-cache")
                || cache_control_directive.eq_ignore_ascii_case("max-age=0")
            {
                return CacheControl::NoCache;
            }
        }

        let if_none_match = parts
            .headers
            .get_all(http::header::IF_NONE_MATCH)
            .into_iter()
            .flat_map(|value| match value.to_str() {
                Ok(value) => value
                    .split(',')
                    .map(|s| s.trim())
                    .map(|s| s.strip_prefix("W/").unwrap_or(s).to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>(),
                Err(err) => {
                    warn!("Failed to parse If-None-Match header: {err}");

                    Vec::new()
                }
            })
            .collect();

        CacheControl::IfNoneMatch(if_none_match)
    }

    /// Decorates an HTTP response with caching headers, respecting the provided cache control
    /// directive.
    ///
    /// Only successful responses are decorated: anything else is returned untouched.
    ///
    /// If the provided response already contains an ETag, it will be used directly. Otherwise, one
    /// will be computed from the response body, effectively disabling any streaming.
    ///
    /// If the provided response already contains a `Cache-Control` header, it will be left
    /// untouched.
    pub async fn check_cache_control(
        &self,
        cache_control: CacheControl,
        mut response: axum::response::Response,
    ) -> Result<axum::response::Response, axum::response::Response> {
        if !response.status().is_success() {
            return Ok(response);
        }

        let mut response = match cache_control {
            CacheControl::IfNoneMatch(if_none_match) => {
                let etag = match response.headers().get(http::header::ETAG) {
                    Some(etag) => etag
                        .to_str()
                        .map_err(|err| {
                            error!("Failed to parse ETag header from response: {err}");

                            http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
                        })?
                        .to_string(),
                    None => {
                        let (parts, body) = response.into_parts();
                        let body = axum::body::to_bytes(body, self.max_body_size)
                            .await
                            .map_err(|err| {
                                error!("Failed to read response body: {err}");

                                http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
                            })?;

                        let etag = compute_etag(&body);

                        response = http::Response::from_parts(parts, body.into());
                        response = response.with_etag(&etag)?;

                        etag
                    }
                };

                if if_none_match.contains("*")
                    || if_none_match.contains(etag.strip_prefix("W/").unwrap_or(&etag))
                {
                    let mut not_modified = axum::response::Response::default();
                    *not_modified.status_mut() = http::StatusCode::NOT_MODIFIED;

                    not_modified.with_etag(&etag)?
                } else {
                    response
                }
            }
            CacheControl::NoCache => response,
        };

        if response
            .headers()
            .get(http::header::CACHE_CONTROL)
            .is_none()
        {
            response = response.with_caching(self.cache_duration);
        }

        Ok(response)
    }
}

/// Compute a strong ETag for the given body.
fn compute_etag(body: &[u8]) -> String {
    let digest = Md5::digest(body);

    format!("\"{}\"", hex::encode(digest))
}

/// The caching directive of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheControl {
    /// The request should be treated only if none of the provided ETags match.
    IfNoneMatch(BTreeSet<String>),

    /// The response should be treated as fresh.
    NoCache,
}

/// An extension trait for caching directives.
pub trait CachingResponseExt {
    /// Decorate the response with a cache control directive.
    fn with_caching(self, duration: Duration) -> axum::response::Response;

    /// Add an ETag to the response.
    ///
    /// The etag value must be convertible to a valid HTTP header value or an error will be
    /// returned.
    fn with_etag(self, etag: &str) -> Result<axum::response::Response, axum::response::Response>;
}

impl CachingResponseExt for axum::response::Response {
    fn with_caching(mut self, duration: Duration) -> axum::response::Response {
        let cache_control = http::header::HeaderValue::from_str(&format!(
            "private, max-age={}, must-revalidate",
            duration.as_secs()
        ))
        .expect("Failed to parse Cache-Control header");

        self.headers_mut()
            .insert(http::header::CACHE_CONTROL, cache_control);

        self
    }

    fn with_etag(
        mut self,
        etag: &str,
    ) -> Result<axum::response::Response, axum::response::Response> {
        self.headers_mut().insert(
            http::header::ETAG,
            http::header::HeaderValue::from_str(etag).map_err(|err| {
                error!("Failed to parse ETag header: {err}");

                http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })?,
        );

        Ok(self)
    }
}
