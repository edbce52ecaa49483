//! The views.
//!
//! This module contains types whose sole goal is to render HTML. Each view is an Askama template
//! paired with an explicit, statically-typed view model.

use askama::Template;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::templating::RenderIntoResponse;

/// The index page.
///
/// The index page takes no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Template)]
#[template(path = "home/index.html.jinja")]
pub struct IndexView {}

/// The data handed to the edit page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditViewModel {
    /// The identifier being edited.
    pub id: i32,
}

/// The edit page.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "home/edit.html.jinja")]
pub struct EditView {
    pub model: EditViewModel,
}

/// The result of a controller action: which view to render, and with what data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewResult {
    /// Render the index view.
    Index(IndexView),

    /// Render the edit view.
    Edit(EditView),
}

impl ViewResult {
    /// The name of the view to render.
    pub fn view_name(&self) -> &'static str {
        match self {
            Self::Index(_) => "Index",
            Self::Edit(_) => "Edit",
        }
    }

    /// The data handed to the view, as a key-value map.
    ///
    /// The index view receives no data.
    pub fn view_data(&self) -> serde_json::Map<String, serde_json::Value> {
        match self {
            Self::Index(_) => serde_json::Map::new(),
            Self::Edit(view) => view.model.to_view_data(),
        }
    }
}

impl EditViewModel {
    /// The key under which the identifier is handed to the view.
    pub const ID: &'static str = "Id";

    fn to_view_data(self) -> serde_json::Map<String, serde_json::Value> {
        let Self { id } = self;

        serde_json::Map::from_iter([(Self::ID.to_string(), id.into())])
    }
}

impl RenderIntoResponse for ViewResult {
    fn try_render_into_response(
        self,
    ) -> Result<axum::response::Response, axum::response::Response> {
        match self {
            Self::Index(view) => view.try_render_into_response(),
            Self::Edit(view) => view.try_render_into_response(),
        }
    }
}

impl IntoResponse for ViewResult {
    fn into_response(self) -> axum::response::Response {
        self.render_into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index() {
        let html = IndexView::default().render().unwrap();

        assert!(html.contains("<title>Index</title>"));
        assert!(html.contains(r#"href="/Home/Edit/1""#));
    }

    #[test]
    fn test_render_edit() {
        let html = EditView {
            model: EditViewModel { id: -12 },
        }
        .render()
        .unwrap();

        assert!(html.contains("<title>Edit</title>"));
        assert!(html.contains(r#"<span id="edit-id">-12</span>"#));
    }

    #[test]
    fn test_edit_view_data() {
        let view = ViewResult::Edit(EditView {
            model: EditViewModel { id: 42 },
        });

        let data = view.view_data();
        assert_eq!(data.len(), 1);
        assert_eq!(data["Id"], serde_json::json!(42));

        // The key matches the serialized view model.
        assert_eq!(
            serde_json::to_value(EditViewModel { id: 42 }).unwrap(),
            serde_json::Value::Object(data)
        );
    }
}
