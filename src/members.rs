//! Member operations on an already-loaded [`Group`].
//!
//! These functions only mutate the in-memory document. Loading it and
//! persisting the result is the caller's job (see [`crate::commands`]), which
//! keeps every rule here testable without touching the filesystem.

use uuid::Uuid;

use crate::error::AppError;
use crate::form::{FormFields, MemberInput};
use crate::models::{Group, Member};

/// Suffix appended to the name of a duplicated member.
pub const COPY_SUFFIX: &str = " (Copy)";

fn member_not_found(uuid: &str) -> AppError {
    AppError::NotFound(format!("Member {uuid} not found"))
}

/// Append a new member built from `input` and return its uuid.
pub fn add_member(group: &mut Group, input: &MemberInput) -> String {
    let mut member = Member {
        uuid: Uuid::new_v4().to_string(),
        movement: input.movement.clone().into_iter().collect(),
        ..Member::default()
    };
    input.write_into(&mut member);

    let uuid = member.uuid.clone();
    group.members.push(member);
    group.touch();
    uuid
}

/// Append a deep copy of the member `source_uuid` under a fresh uuid.
///
/// A non-empty name gets [`COPY_SUFFIX`] so the copy is distinguishable in
/// the roster list. Returns the new uuid.
pub fn duplicate_member(group: &mut Group, source_uuid: &str) -> Result<String, AppError> {
    let mut copy = group
        .member(source_uuid)
        .cloned()
        .ok_or_else(|| member_not_found(source_uuid))?;

    copy.uuid = fresh_member_uuid(group);
    if !copy.name.is_empty() {
        copy.name.push_str(COPY_SUFFIX);
    }

    let uuid = copy.uuid.clone();
    group.members.push(copy);
    group.touch();
    Ok(uuid)
}

/// Replace every field of the member `uuid` with `input`.
///
/// Full-replace semantics: a field left off the form reverts to its default.
/// The one exception is `move`, which is only replaced when `input` carries a
/// move entry.
pub fn edit_member(group: &mut Group, uuid: &str, input: &MemberInput) -> Result<(), AppError> {
    let member = group
        .members
        .iter_mut()
        .find(|m| m.uuid == uuid)
        .ok_or_else(|| member_not_found(uuid))?;

    input.write_into(member);
    input.write_move_into(member);

    group.touch();
    Ok(())
}

/// Remove the first member whose uuid matches and return it.
pub fn delete_member(group: &mut Group, uuid: &str) -> Result<Member, AppError> {
    let index = group
        .members
        .iter()
        .position(|m| m.uuid == uuid)
        .ok_or_else(|| member_not_found(uuid))?;

    let removed = group.members.remove(index);
    group.touch();
    Ok(removed)
}

/// Form values for pre-populating the "new member" form from an existing
/// member. Empty when `source_uuid` is not in the group.
pub fn prefill_from_member(group: &Group, source_uuid: &str) -> FormFields {
    group
        .member(source_uuid)
        .map(FormFields::from_member)
        .unwrap_or_default()
}

/// Give every member a new uuid. Used when copying a group as a new roster.
pub fn reassign_member_ids(group: &mut Group) {
    for member in &mut group.members {
        member.uuid = Uuid::new_v4().to_string();
    }
}

/// A v4 uuid not already used by a member of `group`.
fn fresh_member_uuid(group: &Group) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if group.member(&candidate).is_none() {
            return candidate;
        }
    }
}
