//! URL map of the editor.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::commands::{groups, members};
use crate::state::AppState;

/// Largest accepted request body (uploads included).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router around `state`.
pub fn build(state: AppState) -> Router {
    Router::new()
        // groups
        .route("/", get(groups::index))
        .route("/new", get(groups::new_group_form).post(groups::create_group))
        .route(
            "/edit/{filename}",
            get(groups::edit_group_form).post(groups::update_group),
        )
        .route("/delete/{filename}", post(groups::delete_group))
        .route(
            "/copy/{filename}",
            get(groups::copy_group_form).post(groups::copy_group),
        )
        .route(
            "/rename/{filename}",
            get(groups::rename_group_form).post(groups::rename_group),
        )
        .route("/download/{filename}", get(groups::download))
        .route("/upload", post(groups::upload))
        // members
        .route(
            "/member/{filename}/new",
            get(members::new_member_form).post(members::create_member),
        )
        .route(
            "/member/{filename}/edit/{member_uuid}",
            get(members::edit_member_form).post(members::update_member),
        )
        .route(
            "/member/{filename}/delete/{member_uuid}",
            post(members::delete_member),
        )
        .route("/health", get(groups::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
