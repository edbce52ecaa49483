//! The Home controller.

mod route;

pub use route::HomeRoute;
use tracing::debug;

use crate::{
    Controller, Route, ServerInfo,
    templating::RenderIntoResponse,
    views::{EditView, EditViewModel, IndexView, ViewResult},
};

/// The Home controller.
///
/// Each action maps a request to a view result, with no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeController;

impl HomeController {
    /// Render the index view.
    pub fn index(&self) -> ViewResult {
        ViewResult::Index(IndexView::default())
    }

    /// Render the edit view for the given identifier.
    ///
    /// The identifier is not validated.
    pub fn edit(&self, id: i32) -> ViewResult {
        ViewResult::Edit(EditView {
            model: EditViewModel { id },
        })
    }
}

impl Controller for HomeController {
    type Route = HomeRoute;
    type Response = Result<axum::response::Response, axum::response::Response>;

    async fn handle_request(
        &self,
        route: Self::Route,
        parts: http::request::Parts,
        server_info: &ServerInfo,
    ) -> Self::Response {
        let view = match route {
            HomeRoute::Index => self.index(),
            HomeRoute::Edit { id } => self.edit(id),
        };

        debug!(
            "{} {}: rendering view `{}`.",
            parts.method,
            route.to_absolute_url(&server_info.base_url),
            view.view_name(),
        );

        view.try_render_into_response()
    }
}
