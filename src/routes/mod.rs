use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod doc;
pub mod health;
pub mod inventory;
pub mod params;
pub mod sales;
pub mod sessions;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/sessions", sessions::router())
        .nest("/sales", sales::router())
        .nest("/inventory", inventory::router())
}
