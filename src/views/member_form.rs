//! Add / edit member form.
//!
//! The form is generated from [`SECTIONS`], so the input names rendered here
//! are exactly the keys [`crate::form::MemberInput::from_fields`] reads.

use crate::form::FormFields;
use crate::models::Member;

use super::{encode, escape, layout, Flash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Int,
    Float,
    Url,
    Checkbox,
    /// A `<select>` over the listed options.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: Kind,
}

const fn field(name: &'static str, label: &'static str, kind: Kind) -> Field {
    Field { name, label, kind }
}

pub const MOVE_TYPES: &[&str] = &["Walk", "Jump", "Tracked", "Wheeled", "Hover", "VTOL", "Naval"];

pub const SECTIONS: &[(&str, &[Field])] = &[
    (
        "Identity",
        &[
            field("name", "Name", Kind::Text),
            field("customName", "Custom name", Kind::Text),
            field("class", "Class", Kind::Text),
            field("variant", "Variant", Kind::Text),
            field("classification", "Classification", Kind::Text),
            field("type", "Type", Kind::Text),
            field("role", "Role", Kind::Text),
            field("dateIntroduced", "Date introduced", Kind::Text),
            field("tro", "TRO", Kind::Text),
            field("mulID", "MUL ID", Kind::Int),
            field("imageURL", "Image URL", Kind::Url),
        ],
    ),
    (
        "Stats",
        &[
            field("tonnage", "Tonnage", Kind::Float),
            field("size", "Size", Kind::Int),
            field("tmm", "TMM", Kind::Float),
            field("armor", "Armor", Kind::Int),
            field("structure", "Structure", Kind::Int),
            field("threshold", "Threshold", Kind::Int),
            field("overheat", "Overheat", Kind::Int),
            field("basePoints", "Base points", Kind::Int),
            field("costCR", "Cost (C-bills)", Kind::Float),
            field("currentSkill", "Current skill", Kind::Int),
            field("currentHeat", "Current heat", Kind::Int),
            field("roundHeat", "Round heat", Kind::Int),
            field("abilities", "Abilities (comma separated)", Kind::Text),
            field("showDetails", "Show details", Kind::Checkbox),
        ],
    ),
    (
        "Movement",
        &[
            field("move_value", "Move", Kind::Int),
            field("move_current", "Current move", Kind::Int),
            field("move_type", "Move type", Kind::Choice(MOVE_TYPES)),
            field("jumpMove", "Jump move", Kind::Int),
        ],
    ),
    (
        "Damage",
        &[
            field("damage_short", "Short", Kind::Int),
            field("damage_medium", "Medium", Kind::Int),
            field("damage_long", "Long", Kind::Int),
            field("damage_extreme", "Extreme", Kind::Int),
        ],
    ),
    (
        "Pilot",
        &[
            field("pilot_name", "Name", Kind::Text),
            field("pilot_piloting", "Piloting", Kind::Int),
            field("pilot_gunnery", "Gunnery", Kind::Int),
            field("pilot_wounds", "Wounds", Kind::Int),
        ],
    ),
];

fn render_field(f: &Field, values: &FormFields) -> String {
    let value = escape(values.get(f.name).unwrap_or_default());
    let (name, label) = (f.name, escape(f.label));
    match f.kind {
        Kind::Checkbox => {
            let checked = if values.flag(f.name) { " checked" } else { "" };
            format!(
                r#"<label><input type="checkbox" name="{name}" value="on"{checked} /> {label}</label>"#
            )
        }
        Kind::Choice(options) => {
            let current = values
                .get(f.name)
                .or_else(|| options.first().copied())
                .unwrap_or_default();
            // An unlisted stored value is offered first and kept selected.
            let mut opts = String::new();
            if !current.is_empty() && !options.contains(&current) {
                opts.push_str(&format!("<option selected>{}</option>", escape(current)));
            }
            for o in options.iter() {
                let selected = if *o == current { " selected" } else { "" };
                opts.push_str(&format!(r#"<option{selected}>{}</option>"#, escape(o)));
            }
            format!(
                r#"<div><label for="{name}">{label}</label><select id="{name}" name="{name}">{opts}</select></div>"#
            )
        }
        kind => {
            let ty = match kind {
                Kind::Int | Kind::Float => "number",
                Kind::Url => "url",
                _ => "text",
            };
            let step = match kind {
                Kind::Float => r#" step="any""#,
                Kind::Int => r#" step="1""#,
                _ => "",
            };
            format!(
                r#"<div><label for="{name}">{label}</label><input type="{ty}"{step} id="{name}" name="{name}" value="{value}" /></div>"#
            )
        }
    }
}

/// The field sections of the form, pre-populated from `values`.
pub fn fields_html(values: &FormFields) -> String {
    SECTIONS
        .iter()
        .map(|(title, fields)| {
            let inputs: String = fields.iter().map(|f| render_field(f, values)).collect();
            format!(
                "<fieldset><legend>{}</legend><div class=\"grid\">{inputs}</div></fieldset>\n",
                escape(title)
            )
        })
        .collect()
}

fn member_label(m: &Member) -> String {
    let name = if m.name.is_empty() { "(unnamed)" } else { &m.name };
    if m.variant.is_empty() {
        name.to_string()
    } else {
        format!("{name} {}", m.variant)
    }
}

/// "New member" page: the duplicate shortcut plus the full form.
pub fn new_member_page(
    filename: &str,
    members: &[Member],
    prefill: &FormFields,
    flash: Option<&Flash>,
) -> String {
    let target = encode(filename);
    let duplicate = if members.is_empty() {
        String::new()
    } else {
        let options: String = members
            .iter()
            .map(|m| {
                format!(
                    r#"<option value="{}">{}</option>"#,
                    escape(&m.uuid),
                    escape(&member_label(m))
                )
            })
            .collect();
        format!(
            r#"<div class="card">
  <strong>Start from an existing member</strong>
  <form method="post" action="/member/{target}/new" class="inline">
    <select name="duplicate_uuid">{options}</select>
    <button type="submit">Duplicate now</button>
  </form>
  <form method="get" action="/member/{target}/new" class="inline">
    <select name="duplicate">{options}</select>
    <button type="submit">Prefill form</button>
  </form>
</div>"#
        )
    };

    let body = format!(
        r#"<p>Group file: <a href="/edit/{target}">{file}</a></p>
{duplicate}
<form method="post" action="/member/{target}/new">
{fields}
  <button type="submit">Add member</button>
</form>"#,
        file = escape(filename),
        fields = fields_html(prefill),
    );
    layout("Add member", flash, &body)
}

/// "Edit member" page.
pub fn edit_member_page(filename: &str, member: &Member, flash: Option<&Flash>) -> String {
    let target = encode(filename);
    let body = format!(
        r#"<p>Group file: <a href="/edit/{target}">{file}</a> · uuid <code>{uuid}</code></p>
<form method="post" action="/member/{target}/edit/{member_uuid}">
{fields}
  <button type="submit">Save member</button>
</form>"#,
        file = escape(filename),
        uuid = escape(&member.uuid),
        member_uuid = encode(&member.uuid),
        fields = fields_html(&FormFields::from_member(member)),
    );
    layout(&format!("Edit {}", member_label(member)), flash, &body)
}
