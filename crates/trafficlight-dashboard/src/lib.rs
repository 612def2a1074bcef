//! trafficlight-dashboard: renderer, dispatcher, and server-rendered UI.
//!
//! The [`Renderer`] keeps a display list of rows keyed by position; the
//! [`Dispatcher`] routes UI actions to the registry and check results to
//! the renderer. The axum handlers here turn the display list into HTML.
//! The page refreshes its list through HTMX partials.
//!
//! # Routes
//!
//! | Method | Route | Handler |
//! |---|---|---|
//! | GET | `/` | Full page: add form + display list |
//! | GET | `/lights` | Display list partial |
//! | POST | `/lights` | Add a URL (form field `url`) |

pub mod actions;
pub mod dispatcher;
pub mod pages;
pub mod partials;
pub mod renderer;
pub mod views;

pub use dispatcher::Dispatcher;
pub use renderer::{Renderer, StatusSource};
pub use views::{truncate_url, DisplayRow, LightView};

use askama::Template;
use axum::Router;
use axum::response::Html;
use axum::routing::get;

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub dispatcher: Dispatcher,
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/lights", get(partials::lights).post(actions::add_light))
        .with_state(state)
}

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}
