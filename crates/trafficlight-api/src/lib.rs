//! trafficlight-api: JSON API for the traffic light monitor.
//!
//! Exposes the registry over HTTP, including the console-style URL update,
//! and merges the dashboard routes at the root.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/lights` | List all lights in position order |
//! | POST | `/api/v1/lights` | Add a URL |
//! | GET | `/api/v1/lights/{position}` | Get one light |
//! | PUT | `/api/v1/lights/{position}/url` | Replace a light's URL |
//! | GET | `/api/v1/display` | Rendered rows in display order |

pub mod handlers;

use axum::Router;
use axum::routing::{get, put};
use trafficlight_dashboard::{DashboardState, Dispatcher};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: Dispatcher,
}

/// Build the complete router (REST + dashboard).
pub fn build_router(dispatcher: Dispatcher) -> Router {
    let api_state = ApiState {
        dispatcher: dispatcher.clone(),
    };

    let dashboard_state = DashboardState { dispatcher };

    let api_routes = Router::new()
        .route("/lights", get(handlers::list_lights).post(handlers::add_light))
        .route("/lights/{position}", get(handlers::get_light))
        .route("/lights/{position}/url", put(handlers::update_url))
        .route("/display", get(handlers::display))
        .with_state(api_state);

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(trafficlight_dashboard::dashboard_router(dashboard_state))
}
