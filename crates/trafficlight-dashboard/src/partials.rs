//! HTMX partial endpoints.
//!
//! These return HTML fragments (not full pages) for HTMX to swap into the
//! display list, so the page follows every check without a reload.

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::views::DisplayRow;
use crate::{render, DashboardState};

#[derive(Template)]
#[template(path = "_partials/lights.html")]
pub(crate) struct LightsPartial {
    pub(crate) rows: Vec<DisplayRow>,
}

#[derive(Template)]
#[template(path = "_partials/add_form.html")]
pub(crate) struct AddFormPartial {
    pub(crate) error: Option<String>,
    pub(crate) value: String,
}

pub async fn lights(State(state): State<DashboardState>) -> Html<String> {
    render(LightsPartial {
        rows: state.dispatcher.rows(),
    })
}
