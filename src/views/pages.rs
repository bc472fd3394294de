//! Group-level pages.

use axum::http::StatusCode;

use crate::models::Group;

use super::{encode, escape, layout, Flash};

/// Group list with upload and create controls.
pub fn index_page(files: &[String], flash: Option<&Flash>) -> String {
    let rows: String = if files.is_empty() {
        "<tr><td colspan=\"2\">No groups yet.</td></tr>".to_string()
    } else {
        files
            .iter()
            .map(|f| {
                let (target, name) = (encode(f), escape(f));
                format!(
                    r#"<tr>
  <td><a href="/edit/{target}">{name}</a></td>
  <td>
    <a href="/download/{target}">Download</a>
    <a href="/copy/{target}">Copy</a>
    <a href="/rename/{target}">Rename</a>
    <form method="post" action="/delete/{target}" class="inline" onsubmit="return confirm('Delete {name}?');">
      <button type="submit" class="danger">Delete</button>
    </form>
  </td>
</tr>
"#
                )
            })
            .collect()
    };

    let body = format!(
        r#"<div class="card">
  <a href="/new">Create a new group</a>
</div>
<div class="card">
  <strong>Upload a group file</strong>
  <form method="post" action="/upload" enctype="multipart/form-data">
    <input type="file" name="file" accept=".json,application/json" />
    <button type="submit">Upload</button>
  </form>
</div>
<table>
  <thead><tr><th>File</th><th>Actions</th></tr></thead>
  <tbody>
{rows}  </tbody>
</table>"#
    );
    layout("Groups", flash, &body)
}

/// Create-group form.
pub fn new_group_page(flash: Option<&Flash>) -> String {
    let body = r#"<form method="post" action="/new">
  <label for="name">Name</label>
  <input type="text" id="name" name="name" value="New Group" />
  <label for="formationBonus">Formation bonus</label>
  <input type="text" id="formationBonus" name="formationBonus" />
  <label for="groupLabel">Group label</label>
  <input type="text" id="groupLabel" name="groupLabel" />
  <label for="filename">Filename (optional)</label>
  <input type="text" id="filename" name="filename" placeholder="group_xxxxxxxx.json" />
  <button type="submit">Create group</button>
</form>"#;
    layout("New group", flash, body)
}

/// Group metadata form plus the member roster.
pub fn edit_group_page(filename: &str, group: &Group, flash: Option<&Flash>) -> String {
    let target = encode(filename);
    let rows: String = if group.members.is_empty() {
        "<tr><td colspan=\"7\">No members yet.</td></tr>".to_string()
    } else {
        group
            .members
            .iter()
            .map(|m| {
                let member = encode(&m.uuid);
                let moves = m
                    .movement
                    .first()
                    .map(|mv| format!("{}\" {}", mv.distance, escape(&mv.move_type)))
                    .unwrap_or_default();
                format!(
                    r#"<tr>
  <td>{name}</td><td>{variant}</td><td>{ty}</td><td>{size}</td><td>{moves}</td><td>{points}</td>
  <td>
    <a href="/member/{target}/edit/{member}">Edit</a>
    <a href="/member/{target}/new?duplicate={member}">Duplicate</a>
    <form method="post" action="/member/{target}/delete/{member}" class="inline">
      <button type="submit" class="danger">Delete</button>
    </form>
  </td>
</tr>
"#,
                    name = escape(&m.name),
                    variant = escape(&m.variant),
                    ty = escape(&m.unit_type),
                    size = m.size,
                    points = m.base_points,
                )
            })
            .collect()
    };

    let body = format!(
        r#"<p>File <code>{file}</code> · uuid <code>{uuid}</code> · last updated {updated}</p>
<p>
  <a href="/download/{target}">Download</a>
  <a href="/copy/{target}">Copy</a>
  <a href="/rename/{target}">Rename</a>
</p>
<form method="post" action="/edit/{target}" class="card">
  <label for="name">Name</label>
  <input type="text" id="name" name="name" value="{name}" />
  <label for="formationBonus">Formation bonus</label>
  <input type="text" id="formationBonus" name="formationBonus" value="{bonus}" />
  <label for="groupLabel">Group label</label>
  <input type="text" id="groupLabel" name="groupLabel" value="{label}" />
  <button type="submit">Save group</button>
</form>
<h2>Members</h2>
<p><a href="/member/{target}/new">Add member</a></p>
<table>
  <thead><tr><th>Name</th><th>Variant</th><th>Type</th><th>Size</th><th>Move</th><th>PV</th><th>Actions</th></tr></thead>
  <tbody>
{rows}  </tbody>
</table>"#,
        file = escape(filename),
        uuid = escape(&group.uuid),
        updated = escape(&group.last_updated),
        name = escape(&group.name),
        bonus = escape(&group.formation_bonus),
        label = escape(&group.group_label),
    );
    layout(&group.name, flash, &body)
}

/// Copy form: new filename plus the reassign-member-uuids checkbox.
pub fn copy_group_page(filename: &str, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<form method="post" action="/copy/{target}">
  <label for="new_filename">New filename</label>
  <input type="text" id="new_filename" name="new_filename" placeholder="copy_of_{file}" />
  <label><input type="checkbox" name="update_member_uuids" value="on" checked /> Give every member a new uuid</label>
  <button type="submit">Copy</button>
</form>"#,
        target = encode(filename),
        file = escape(filename),
    );
    layout(&format!("Copy {filename}"), flash, &body)
}

/// Rename form.
pub fn rename_group_page(filename: &str, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<form method="post" action="/rename/{target}">
  <label for="new_filename">New filename</label>
  <input type="text" id="new_filename" name="new_filename" value="{file}" />
  <button type="submit">Rename</button>
</form>"#,
        target = encode(filename),
        file = escape(filename),
    );
    layout(&format!("Rename {filename}"), flash, &body)
}

/// Page shown for a failed request.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = r#"<p><a href="/">Back to groups</a></p>"#;
    layout(title, Some(&Flash::danger(message)), body)
}
