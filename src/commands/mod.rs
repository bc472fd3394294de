//! HTTP request handlers.
//!
//! Sub-modules are grouped by concern:
//! - [`groups`]  — list, create, edit, copy, rename, delete, download, upload
//! - [`members`] — add, duplicate, edit, delete members of one group
//!
//! Every handler follows the pattern of an `_inner` function (testable
//! without a router, taking the [`GroupStore`](crate::store::GroupStore)
//! directly) wrapped by a thin axum handler that extracts state, path, query
//! and form, then turns the outcome into a page or a redirect.
//!
//! # Error contract
//! Every fallible path returns `Result<_, AppError>`; `AppError` renders
//! itself as an error page with the matching status code.

pub mod groups;
pub mod members;

use axum::response::Redirect;

use crate::views::{encode, Flash};

/// 303 redirect to `path` carrying a success banner.
pub(crate) fn see_other(path: &str, message: impl Into<String>) -> Redirect {
    Redirect::to(&Flash::success(message).location(path))
}

/// `/edit/<filename>`, encoded for use in a Location header.
pub(crate) fn group_path(filename: &str) -> String {
    format!("/edit/{}", encode(filename))
}
