//! Server options.

use std::{net::SocketAddr, time::Duration};

/// The options for the server.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// The base HTTP URL of the server.
    ///
    /// If the server is running behind a reverse proxy, this should be set to the base URL of the
    /// proxy.
    ///
    /// If no base URL is set, the server will attempt to determine the base URL from its own TCP
    /// listener address.
    pub base_url: Option<http::Uri>,

    /// The address to listen on.
    pub listen_addr: SocketAddr,

    /// How long clients may reuse a rendered page before revalidating it.
    pub cache_max_age: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache_max_age: Duration::from_secs(60),
        }
    }
}

/// An error that can occur when trying to get the server options from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ServerOptionsFromEnvError {
    /// An environment variable was not unicode.
    #[error("environment variable {name} was not unicode")]
    NotUnicode {
        /// The name of the environment variable.
        name: &'static str,
    },

    /// An error occurred while trying to get the base URL from the environment.
    #[error("failed to parse the base URL from environment variable {name} (was `{url}`): {err}")]
    BaseUrl {
        /// The name of the environment variable.
        name: &'static str,

        /// The URL that was attempted to be parsed.
        url: String,

        /// The error that occurred.
        #[source]
        err: http::uri::InvalidUri,
    },

    /// An error occurred while trying to get the listen address from the environment.
    #[error(
        "failed to parse the listen address from environment variable {name} (was `{addr}`): {err}"
    )]
    ListenAddr {
        /// The name of the environment variable.
        name: &'static str,

        /// The address that was attempted to be parsed.
        addr: String,

        /// The error that occurred.
        #[source]
        err: std::net::AddrParseError,
    },

    /// An error occurred while trying to get the cache max age from the environment.
    #[error(
        "failed to parse the cache max age from environment variable {name} (was `{value}`): {err}"
    )]
    CacheMaxAge {
        /// The name of the environment variable.
        name: &'static str,

        /// The value that was attempted to be parsed.
        value: String,

        /// The error that occurred.
        #[source]
        err: std::num::ParseIntError,
    },
}

impl ServerOptions {
    /// The environment variable name for the base URL.
    pub const HOME_MVC_BASE_URL: &'static str = "HOME_MVC_BASE_URL";

    /// The environment variable name for the listen address.
    pub const HOME_MVC_LISTEN_ADDR: &'static str = "HOME_MVC_LISTEN_ADDR";

    /// The environment variable name for the cache max age, in seconds.
    pub const HOME_MVC_CACHE_MAX_AGE: &'static str = "HOME_MVC_CACHE_MAX_AGE";

    /// Get the server options from the environment.
    pub fn from_env() -> Result<Self, ServerOptionsFromEnvError> {
        tracing::info!("Reading server options from the environment...");

        Self::from_vars(|name| std::env::var(name))
    }

    /// Get the server options from an arbitrary variable lookup.
    ///
    /// Empty variables are treated as unset.
    pub fn from_vars(
        lookup: impl Fn(&'static str) -> Result<String, std::env::VarError>,
    ) -> Result<Self, ServerOptionsFromEnvError> {
        let var = |name: &'static str| match lookup(name) {
            Ok(value) => Ok(if value.is_empty() { None } else { Some(value) }),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ServerOptionsFromEnvError::NotUnicode { name })
            }
        };

        let defaults = Self::default();

        let base_url = var(Self::HOME_MVC_BASE_URL)?
            .map(|url| {
                url.parse()
                    .map_err(|err| ServerOptionsFromEnvError::BaseUrl {
                        name: Self::HOME_MVC_BASE_URL,
                        url: url.clone(),
                        err,
                    })
            })
            .transpose()?;

        match &base_url {
            Some(base_url) => {
                tracing::info!(
                    "{} was set: using `{base_url}` as the base URL.",
                    Self::HOME_MVC_BASE_URL
                );
            }
            None => {
                tracing::warn!(
                    "{} was not set: base URL will be determined from the TCP listener address. This may not be what you want.",
                    Self::HOME_MVC_BASE_URL
                );
            }
        };

        let listen_addr = var(Self::HOME_MVC_LISTEN_ADDR)?
            .map(|addr| {
                addr.parse()
                    .map_err(|err| ServerOptionsFromEnvError::ListenAddr {
                        name: Self::HOME_MVC_LISTEN_ADDR,
                        addr: addr.clone(),
                        err,
                    })
            })
            .transpose()?
            .unwrap_or(defaults.listen_addr);

        let cache_max_age = var(Self::HOME_MVC_CACHE_MAX_AGE)?
            .map(|value| {
                value
                    .parse()
                    .map(Duration::from_secs)
                    .map_err(|err| ServerOptionsFromEnvError::CacheMaxAge {
                        name: Self::HOME_MVC_CACHE_MAX_AGE,
                        value: value.clone(),
                        err,
                    })
            })
            .transpose()?
            .unwrap_or(defaults.cache_max_age);

        Ok(Self {
            base_url,
            listen_addr,
            cache_max_age,
        })
    }
}
