//! Application state shared by every request handler.
//!
//! [`AppState`] is attached to the router with `Router::with_state` and
//! reached from handlers through `axum::extract::State<AppState>`.

use std::sync::Arc;

use crate::store::GroupStore;

/// Root application state.
///
/// Cloned per request; the store itself is shared behind an [`Arc`] and does
/// its own per-file locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<GroupStore>,
}

impl AppState {
    pub fn new(store: GroupStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
