//! Dashboard page handlers.

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::views::DisplayRow;
use crate::{render, DashboardState};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    light_count: usize,
    rows: Vec<DisplayRow>,
    error: Option<String>,
    value: String,
}

pub async fn index(State(state): State<DashboardState>) -> Html<String> {
    render(IndexTemplate {
        light_count: state.dispatcher.registry().len(),
        rows: state.dispatcher.rows(),
        error: None,
        value: String::new(),
    })
}
