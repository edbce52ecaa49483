//! Home MVC
//!
//! A Home controller with two actions, `Index` and `Edit`, served through Axum and rendered with
//! Askama templates.
//!
//! # Features
//!
//! - `auto-reload`: Take over the TCP listener passed down by `listenfd` when available, so the
//!   server can be restarted without dropping connections. Useful for development. **Not enabled
//!   by default.**
//! - `interfaces`: Enrich the local base URL guessing logic with the ability to inspect the
//!   workstation's network interfaces. Useful for development. **Not enabled by default.**

pub mod caching;
pub mod home;
pub mod templating;
pub mod views;

mod controller;
mod route;
mod server;

pub use controller::Controller;
pub use home::{HomeController, HomeRoute};
pub use route::{ParseError, Route, decode_path_argument};
pub use server::{
    BindError, ControllerRouter, ServeError, Server, ServerInfo, ServerOptions,
    ServerOptionsFromEnvError,
};
