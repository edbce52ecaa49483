//! The route trait.

use std::{fmt::Display, str::FromStr};

use percent_encoding::percent_decode_str;

mod error;

pub use error::ParseError;

/// The route trait can be implemented for types that represent a possible set of routes in an
/// application.
///
/// The `Display` implementation must yield the canonical URL of the route.
pub trait Route: Display {
    /// Get the method for the route.
    fn method(&self) -> http::Method;

    /// Get an absolute URL for the route.
    fn to_absolute_url(&self, base_url: &http::Uri) -> String {
        format!("{}{}", base_url.to_string().trim_end_matches('/'), self)
    }
}

/// Decode a path argument into a value.
///
/// The value is percent-decoded before being parsed.
pub fn decode_path_argument<T>(key: &'static str, value: &str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: Display,
{
    let decoded = percent_decode_str(value)
        .decode_utf8()
        .map_err(|err| ParseError::PathParamParse {
            param_name: key.to_string(),
            value: value.to_string(),
            error: err.to_string(),
        })?;

    decoded.parse().map_err(|err: T::Err| ParseError::PathParamParse {
        param_name: key.to_string(),
        value: decoded.to_string(),
        error: err.to_string(),
    })
}
