//! Member handlers. Each mutation is one load-mutate-save span on the store.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Form;

use crate::error::AppError;
use crate::form::{FormFields, MemberInput};
use crate::members;
use crate::state::AppState;
use crate::store::{normalize_filename, GroupStore};
use crate::views::member_form;
use crate::views::PageQuery;

use super::{group_path, see_other};

/// What a submitted "new member" form did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Added {
    /// A member was built from the form fields.
    Created { uuid: String, name: String },
    /// An existing member was copied via `duplicate_uuid`.
    Duplicated { uuid: String },
}

// ── add / duplicate ───────────────────────────────────────────────────────────

/// Testable inner logic for [`create_member`].
///
/// A non-blank `duplicate_uuid` field duplicates that member immediately and
/// ignores every other field. Otherwise the form is coerced into a
/// [`MemberInput`] before the file is touched, so a malformed number leaves
/// the group unchanged.
pub(crate) fn create_member_inner(
    store: &GroupStore,
    filename: &str,
    fields: &FormFields,
) -> Result<Added, AppError> {
    if let Some(source) = fields.present("duplicate_uuid") {
        let uuid = store.modify(filename, |group| members::duplicate_member(group, source))?;
        tracing::info!(%filename, source, %uuid, "member duplicated");
        return Ok(Added::Duplicated { uuid });
    }

    let input = MemberInput::from_fields(fields)?;
    let uuid = store.modify(filename, |group| Ok(members::add_member(group, &input)))?;
    tracing::info!(%filename, %uuid, "member added");
    Ok(Added::Created {
        uuid,
        name: input.name,
    })
}

/// Testable inner logic for [`new_member_form`]: the group's members and the
/// prefill mapping for `?duplicate=<uuid>`.
pub(crate) fn new_member_form_inner(
    store: &GroupStore,
    filename: &str,
    duplicate: Option<&str>,
) -> Result<(Vec<crate::models::Member>, FormFields), AppError> {
    let group = store.load(filename)?;
    let prefill = duplicate
        .map(|uuid| members::prefill_from_member(&group, uuid))
        .unwrap_or_default();
    Ok((group.members, prefill))
}

/// GET /member/{filename}/new
pub async fn new_member_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filename = normalize_filename(&filename)?;
    let (roster, prefill) =
        new_member_form_inner(&state.store, &filename, query.duplicate.as_deref())?;
    Ok(Html(member_form::new_member_page(
        &filename,
        &roster,
        &prefill,
        query.flash().as_ref(),
    )))
}

/// POST /member/{filename}/new
pub async fn create_member(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let filename = normalize_filename(&filename)?;
    let message = match create_member_inner(&state.store, &filename, &fields)? {
        Added::Created { name, .. } => format!("Member \"{name}\" added successfully!"),
        Added::Duplicated { .. } => "Member duplicated and added successfully!".to_string(),
    };
    Ok(see_other(&group_path(&filename), message))
}

// ── edit ──────────────────────────────────────────────────────────────────────

/// Testable inner logic for [`update_member`].
pub(crate) fn update_member_inner(
    store: &GroupStore,
    filename: &str,
    member_uuid: &str,
    fields: &FormFields,
) -> Result<(), AppError> {
    let input = MemberInput::from_fields(fields)?;
    store.modify(filename, |group| {
        members::edit_member(group, member_uuid, &input)
    })?;
    tracing::info!(%filename, %member_uuid, "member updated");
    Ok(())
}

/// GET /member/{filename}/edit/{member_uuid}
pub async fn edit_member_form(
    State(state): State<AppState>,
    Path((filename, member_uuid)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filename = normalize_filename(&filename)?;
    let group = state.store.load(&filename)?;
    let member = group
        .member(&member_uuid)
        .ok_or_else(|| AppError::NotFound(format!("Member {member_uuid} not found")))?;
    Ok(Html(member_form::edit_member_page(
        &filename,
        member,
        query.flash().as_ref(),
    )))
}

/// POST /member/{filename}/edit/{member_uuid}
pub async fn update_member(
    State(state): State<AppState>,
    Path((filename, member_uuid)): Path<(String, String)>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let filename = normalize_filename(&filename)?;
    update_member_inner(&state.store, &filename, &member_uuid, &fields)?;
    Ok(see_other(&group_path(&filename), "Member updated successfully!"))
}

// ── delete ────────────────────────────────────────────────────────────────────

/// Testable inner logic for [`delete_member`].
pub(crate) fn delete_member_inner(
    store: &GroupStore,
    filename: &str,
    member_uuid: &str,
) -> Result<crate::models::Member, AppError> {
    let removed = store.modify(filename, |group| {
        members::delete_member(group, member_uuid)
    })?;
    tracing::info!(%filename, %member_uuid, "member deleted");
    Ok(removed)
}

/// POST /member/{filename}/delete/{member_uuid}
pub async fn delete_member(
    State(state): State<AppState>,
    Path((filename, member_uuid)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let filename = normalize_filename(&filename)?;
    delete_member_inner(&state.store, &filename, &member_uuid)?;
    Ok(see_other(&group_path(&filename), "Member deleted successfully!"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::GroupInput;

    fn store_with_group() -> (tempfile::TempDir, GroupStore, String) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = GroupStore::open(dir.path()).expect("open");
        let (filename, _) = store
            .create(&GroupInput {
                name: Some("Alpha Lance".to_string()),
                filename: Some("alpha".to_string()),
                ..GroupInput::default()
            })
            .expect("create");
        (dir, store, filename)
    }

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn add_then_delete_round_trip() {
        let (_dir, store, filename) = store_with_group();

        let added = create_member_inner(
            &store,
            &filename,
            &fields(&[("name", "Atlas"), ("tonnage", "100"), ("tmm", "")]),
        )
        .expect("add");
        let Added::Created { uuid, name } = added else {
            panic!("expected Created");
        };
        assert_eq!(name, "Atlas");

        let group = store.load(&filename).expect("load");
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].tonnage, 100.0);
        assert_eq!(group.members[0].tmm, 0.0);

        let removed = delete_member_inner(&store, &filename, &uuid).expect("delete");
        assert_eq!(removed.uuid, uuid);
        assert!(store.load(&filename).expect("load").members.is_empty());
    }

    #[test]
    fn malformed_number_leaves_file_unchanged() {
        let (_dir, store, filename) = store_with_group();
        let before = store.export_document(&filename).expect("export");

        let result = create_member_inner(&store, &filename, &fields(&[("armor", "lots")]));

        assert!(matches!(result, Err(AppError::InvalidFormat(_))));
        assert_eq!(store.export_document(&filename).expect("export"), before);
    }

    #[test]
    fn duplicate_uuid_field_takes_precedence() {
        let (_dir, store, filename) = store_with_group();
        let Added::Created { uuid, .. } =
            create_member_inner(&store, &filename, &fields(&[("name", "Atlas")])).expect("add")
        else {
            panic!("expected Created");
        };

        let added = create_member_inner(
            &store,
            &filename,
            &fields(&[
                ("duplicate_uuid", uuid.as_str()),
                ("name", "ignored"),
                ("armor", "x"),
            ]),
        )
        .expect("duplicate");

        let Added::Duplicated { uuid: copy_uuid } = added else {
            panic!("expected Duplicated");
        };
        let group = store.load(&filename).expect("load");
        assert_eq!(group.members.len(), 2);
        assert_ne!(copy_uuid, uuid);
        assert_eq!(group.members[1].name, "Atlas (Copy)");
    }

    #[test]
    fn duplicate_of_unknown_member_is_not_found() {
        let (_dir, store, filename) = store_with_group();
        let result = create_member_inner(&store, &filename, &fields(&[("duplicate_uuid", "nope")]));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn prefill_for_known_and_unknown_member() {
        let (_dir, store, filename) = store_with_group();
        let Added::Created { uuid, .. } = create_member_inner(
            &store,
            &filename,
            &fields(&[("name", "Atlas"), ("abilities", "ENE, IF1")]),
        )
        .expect("add") else {
            panic!("expected Created");
        };

        let (roster, prefill) =
            new_member_form_inner(&store, &filename, Some(&uuid)).expect("form");
        assert_eq!(roster.len(), 1);
        assert_eq!(prefill.get("name"), Some("Atlas"));
        assert_eq!(prefill.get("abilities"), Some("ENE, IF1"));

        let (_, empty) = new_member_form_inner(&store, &filename, Some("nope")).expect("form");
        assert!(empty.is_empty());
    }

    #[test]
    fn update_replaces_fields_and_missing_member_is_not_found() {
        let (_dir, store, filename) = store_with_group();
        let Added::Created { uuid, .. } = create_member_inner(
            &store,
            &filename,
            &fields(&[("name", "Atlas"), ("armor", "10"), ("move_value", "6")]),
        )
        .expect("add") else {
            panic!("expected Created");
        };

        update_member_inner(&store, &filename, &uuid, &fields(&[("name", "Atlas II")]))
            .expect("update");
        let member = store.load(&filename).expect("load").members.remove(0);
        assert_eq!(member.name, "Atlas II");
        assert_eq!(member.armor, 0);
        assert_eq!(member.movement.len(), 1);
        assert_eq!(member.movement[0].distance, 6);

        let missing = update_member_inner(&store, &filename, "nope", &FormFields::new());
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn delete_unknown_member_is_not_found() {
        let (_dir, store, filename) = store_with_group();
        let result = delete_member_inner(&store, &filename, "nope");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
