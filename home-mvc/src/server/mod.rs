use std::{
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

use tokio::net::TcpListener;
use tracing::{info, warn};

mod controller_router;
mod options;

pub use controller_router::ControllerRouter;
pub use options::{ServerOptions, ServerOptionsFromEnvError};

/// The server information.
///
/// This information is made available to the controller on every request.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// The base URL of the server.
    pub base_url: http::Uri,
}

/// A bound server, ready to serve a controller.
pub struct Server {
    listener: TcpListener,
    shutdown: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
    base_url: Option<http::Uri>,
}

/// An error that can occur when binding a new server.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The listener handed over by `listenfd` could not be used.
    #[cfg(feature = "auto-reload")]
    #[error("failed to take over the `listenfd` listener: {0}")]
    ListenFd(std::io::Error),

    /// An error occurred while trying to bind to the listen address.
    #[error("failed to bind to `{addr}`: {err}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,

        /// The error that occurred.
        #[source]
        err: std::io::Error,
    },
}

/// An error that can occur when trying to serve the application.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// An error occurred while trying to serve the application.
    #[error("failed to serve the application: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while trying to get the local address of the listener.
    #[error("failed to get the local address of the listener: {0}")]
    LocalAddr(std::io::Error),
}

impl Server {
    /// Bind a server to the listen address from the options.
    ///
    /// With the `auto-reload` feature, a listener passed down through `listenfd` (as `systemfd`
    /// does) is used instead, so that restarts keep pending connections.
    pub async fn bind(options: ServerOptions) -> Result<Self, BindError> {
        let addr = options.listen_addr;

        #[cfg(feature = "auto-reload")]
        let inherited = Self::take_listenfd_listener()?;
        #[cfg(not(feature = "auto-reload"))]
        let inherited = None;

        let listener = match inherited {
            Some(listener) => listener,
            None => TcpListener::bind(addr)
                .await
                .map_err(|err| BindError::Bind { addr, err })?,
        };

        Ok(Self {
            listener,
            shutdown: None,
            base_url: options.base_url,
        })
    }

    #[cfg(feature = "auto-reload")]
    fn take_listenfd_listener() -> Result<Option<TcpListener>, BindError> {
        let Some(listener) = listenfd::ListenFd::from_env()
            .take_tcp_listener(0)
            .map_err(BindError::ListenFd)?
        else {
            tracing::debug!("No `listenfd` listener, binding a new one.");

            return Ok(None);
        };

        tracing::debug!("Taking over the `listenfd` listener.");

        listener.set_nonblocking(true).map_err(BindError::ListenFd)?;

        TcpListener::from_std(listener)
            .map(Some)
            .map_err(BindError::ListenFd)
    }

    /// Stop accepting connections once `ctrl-c` is received, letting in-flight requests finish.
    pub fn with_ctrl_c_graceful_shutdown(mut self) -> Self {
        self.shutdown = Some(Box::pin(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received `ctrl-c`, shutting down gracefully."),
                Err(err) => tracing::error!("Cannot listen for `ctrl-c`: {err}"),
            }
        }));
        self
    }

    /// Serve the specified controller until the shutdown signal, if any, fires.
    pub async fn serve<C>(self, controller: C) -> Result<(), ServeError>
    where
        C: super::Controller<Response = Result<axum::response::Response, axum::response::Response>>
            + 'static,
    {
        let local_addr = self.listener.local_addr().map_err(ServeError::LocalAddr)?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| Self::guess_base_url(local_addr));

        info!("Serving on TCP/{local_addr} as `{base_url}`.");

        let router = ControllerRouter::new(controller).into_router(Arc::new(ServerInfo { base_url }));
        let serve = axum::serve(self.listener, router);

        match self.shutdown {
            Some(signal) => serve.with_graceful_shutdown(signal).await,
            None => serve.await,
        }
        .map_err(Into::into)
    }

    /// Derive a base URL from the address the listener is bound to.
    fn guess_base_url(local_addr: SocketAddr) -> http::Uri {
        let authority = if local_addr.ip().is_unspecified() {
            warn!(
                "Bound to `{local_addr}` without {}: the base URL host is a guess.",
                ServerOptions::HOME_MVC_BASE_URL
            );

            match default_interface_ip() {
                Some(ip) => SocketAddr::new(ip, local_addr.port()).to_string(),
                None => format!("localhost:{}", local_addr.port()),
            }
        } else {
            local_addr.to_string()
        };

        http::Uri::builder()
            .scheme("http")
            .authority(authority)
            .path_and_query("/")
            .build()
            .expect("socket address yields a valid authority")
    }
}

/// The first address of the default network interface.
#[cfg(feature = "interfaces")]
fn default_interface_ip() -> Option<IpAddr> {
    let interface = netdev::get_default_interface()
        .inspect_err(|err| tracing::error!("Cannot determine the default interface: {err}"))
        .ok()?;

    interface
        .ipv4
        .iter()
        .map(|net| IpAddr::V4(net.addr()))
        .chain(interface.ipv6.iter().map(|net| IpAddr::V6(net.addr())))
        .next()
}

#[cfg(not(feature = "interfaces"))]
fn default_interface_ip() -> Option<IpAddr> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_base_url() {
        assert_eq!(
            Server::guess_base_url("127.0.0.1:3000".parse().unwrap()).to_string(),
            "http://127.0.0.1:3000/"
        );
        assert_eq!(
            Server::guess_base_url("[::1]:8080".parse().unwrap()).to_string(),
            "http://[::1]:8080/"
        );
    }

    #[cfg(not(feature = "interfaces"))]
    #[test]
    fn test_guess_base_url_unspecified() {
        assert_eq!(
            Server::guess_base_url("0.0.0.0:3000".parse().unwrap()).to_string(),
            "http://localhost:3000/"
        );
    }

    #[tokio::test]
    async fn test_bind() {
        let options = ServerOptions {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            base_url: Some("https://example.com".parse().unwrap()),
            ..Default::default()
        };

        let server = Server::bind(options).await.unwrap();

        assert_ne!(server.listener.local_addr().unwrap().port(), 0);
        assert!(server.shutdown.is_none());
        assert_eq!(server.base_url, Some("https://example.com".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_bind_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let options = ServerOptions {
            listen_addr: taken.local_addr().unwrap(),
            ..Default::default()
        };

        let err = Server::bind(options).await.err().unwrap();

        assert!(matches!(err, BindError::Bind { .. }));
    }
}
