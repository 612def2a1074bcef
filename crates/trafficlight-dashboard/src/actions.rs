//! Dashboard action endpoints.
//!
//! HTMX form handlers that perform mutations and return updated
//! HTML fragments.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::partials::AddFormPartial;
use crate::{render, DashboardState};

/// Event name the display list listens for to refresh right away.
pub const LIGHT_ADDED_EVENT: &str = "light-added";

#[derive(serde::Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub url: String,
}

/// POST /lights: register the submitted URL and return a cleared form.
pub async fn add_light(
    State(state): State<DashboardState>,
    Form(mut form): Form<AddForm>,
) -> Response {
    match state.dispatcher.on_add_url(&mut form.url) {
        Ok(position) => {
            debug!(position, "light added from dashboard");
            (
                [("HX-Trigger", LIGHT_ADDED_EVENT)],
                render(AddFormPartial {
                    error: None,
                    value: form.url,
                }),
            )
                .into_response()
        }
        Err(e) => render(AddFormPartial {
            error: Some(e.to_string()),
            value: form.url,
        })
        .into_response(),
    }
}
