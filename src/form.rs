//! Typed inputs built from submitted form fields.
//!
//! Every value arrives from the browser as text. This module is the single
//! place where that text becomes typed data: blank or missing numbers take
//! their default from [`INT_DEFAULTS`] / [`FLOAT_DEFAULTS`], anything else
//! that fails to parse is rejected with [`AppError::InvalidFormat`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Damage, Member, MoveEntry, Pilot, DEFAULT_MOVE_TYPE};

/// Integer form fields and the value used when they are missing or blank.
pub const INT_DEFAULTS: &[(&str, i64)] = &[
    ("threshold", 0),
    ("mulID", 0),
    ("basePoints", 0),
    ("currentSkill", 4),
    ("overheat", 0),
    ("structure", 0),
    ("armor", 0),
    ("size", 1),
    ("currentHeat", 0),
    ("roundHeat", 0),
    ("jumpMove", 0),
    ("move_value", 0),
    ("move_current", 0),
    ("damage_short", 0),
    ("damage_medium", 0),
    ("damage_long", 0),
    ("damage_extreme", 0),
    ("pilot_piloting", 4),
    ("pilot_gunnery", 4),
    ("pilot_wounds", 0),
];

/// Float form fields and the value used when they are missing or blank.
pub const FLOAT_DEFAULTS: &[(&str, f64)] = &[("tmm", 0.0), ("tonnage", 0.0), ("costCR", 0.0)];

/// Raw `name → value` pairs of a submitted form.
///
/// Deserializes directly from `application/x-www-form-urlencoded` bodies and
/// query strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// The raw value, if the field was submitted at all.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The value, only if it is non-blank. Returned trimmed.
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The raw value, or `""` when missing.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// A checkbox: checked only when submitted with the value `on`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("on")
    }

    pub fn int(&self, key: &str) -> Result<i64, AppError> {
        match self.present(key) {
            None => Ok(int_default(key)),
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                AppError::InvalidFormat(format!("{key}: \"{raw}\" is not a whole number"))
            }),
        }
    }

    pub fn float(&self, key: &str) -> Result<f64, AppError> {
        match self.present(key) {
            None => Ok(float_default(key)),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AppError::InvalidFormat(format!("{key}: \"{raw}\" is not a number"))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The creation-form fields that reproduce `member` when submitted.
    pub fn from_member(member: &Member) -> Self {
        let mut f = Self::new();
        f.insert("class", &member.class);
        f.insert("variant", &member.variant);
        f.insert("name", &member.name);
        f.insert("customName", &member.custom_name);
        f.insert("classification", &member.classification);
        f.insert("dateIntroduced", &member.date_introduced);
        f.insert("tmm", member.tmm.to_string());
        f.insert("tonnage", member.tonnage.to_string());
        f.insert("tro", &member.tro);
        f.insert("role", &member.role);
        f.insert("threshold", member.threshold.to_string());
        f.insert("costCR", member.cost_cr.to_string());
        f.insert("mulID", member.mul_id.to_string());
        f.insert("basePoints", member.base_points.to_string());
        f.insert("currentSkill", member.current_skill.to_string());
        f.insert("overheat", member.overheat.to_string());
        f.insert("structure", member.structure.to_string());
        f.insert("armor", member.armor.to_string());
        f.insert("type", &member.unit_type);
        f.insert("size", member.size.to_string());
        if member.show_details {
            f.insert("showDetails", "on");
        }
        f.insert("imageURL", &member.image_url);
        f.insert("currentHeat", member.current_heat.to_string());
        f.insert("roundHeat", member.round_heat.to_string());
        f.insert("abilities", member.abilities.join(", "));
        f.insert("jumpMove", member.jump_move.to_string());
        if let Some(mv) = member.movement.first() {
            f.insert("move_value", mv.distance.to_string());
            f.insert("move_current", mv.current_move.to_string());
            f.insert("move_type", &mv.move_type);
        }
        f.insert("damage_short", member.damage.short.to_string());
        f.insert("damage_medium", member.damage.medium.to_string());
        f.insert("damage_long", member.damage.long.to_string());
        f.insert("damage_extreme", member.damage.extreme.to_string());
        f.insert("pilot_name", &member.pilot.name);
        f.insert("pilot_piloting", member.pilot.piloting.to_string());
        f.insert("pilot_gunnery", member.pilot.gunnery.to_string());
        f.insert("pilot_wounds", member.pilot.wounds.to_string());
        f
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn int_default(key: &str) -> i64 {
    INT_DEFAULTS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(0, |(_, d)| *d)
}

fn float_default(key: &str) -> f64 {
    FLOAT_DEFAULTS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(0.0, |(_, d)| *d)
}

/// Split a comma-separated abilities string, dropping empty entries.
pub fn parse_abilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Member ────────────────────────────────────────────────────────────────────

/// Every member field except `uuid`, fully coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInput {
    pub class: String,
    pub variant: String,
    pub name: String,
    pub custom_name: String,
    pub classification: String,
    pub date_introduced: String,
    pub tmm: f64,
    pub tonnage: f64,
    pub tro: String,
    pub role: String,
    pub threshold: i64,
    pub cost_cr: f64,
    pub mul_id: i64,
    pub base_points: i64,
    pub current_skill: i64,
    pub overheat: i64,
    pub structure: i64,
    pub armor: i64,
    pub unit_type: String,
    pub size: i64,
    pub show_details: bool,
    pub image_url: String,
    pub current_heat: i64,
    pub round_heat: i64,
    pub abilities: Vec<String>,
    pub jump_move: i64,
    /// `Some` only when a non-blank `move_value` was submitted.
    pub movement: Option<MoveEntry>,
    pub damage: Damage,
    pub pilot: Pilot,
}

impl MemberInput {
    pub fn from_fields(f: &FormFields) -> Result<Self, AppError> {
        let movement = match f.present("move_value") {
            Some(_) => Some(MoveEntry {
                distance: f.int("move_value")?,
                current_move: f.int("move_current")?,
                move_type: f.present("move_type").unwrap_or(DEFAULT_MOVE_TYPE).to_string(),
                ..MoveEntry::default()
            }),
            None => None,
        };

        Ok(Self {
            class: f.text("class"),
            variant: f.text("variant"),
            name: f.text("name"),
            custom_name: f.text("customName"),
            classification: f.text("classification"),
            date_introduced: f.text("dateIntroduced"),
            tmm: f.float("tmm")?,
            tonnage: f.float("tonnage")?,
            tro: f.text("tro"),
            role: f.text("role"),
            threshold: f.int("threshold")?,
            cost_cr: f.float("costCR")?,
            mul_id: f.int("mulID")?,
            base_points: f.int("basePoints")?,
            current_skill: f.int("currentSkill")?,
            overheat: f.int("overheat")?,
            structure: f.int("structure")?,
            armor: f.int("armor")?,
            unit_type: f.text("type"),
            size: f.int("size")?,
            show_details: f.flag("showDetails"),
            image_url: f.text("imageURL"),
            current_heat: f.int("currentHeat")?,
            round_heat: f.int("roundHeat")?,
            abilities: parse_abilities(f.get("abilities").unwrap_or_default()),
            jump_move: f.int("jumpMove")?,
            movement,
            damage: Damage {
                short: f.int("damage_short")?,
                medium: f.int("damage_medium")?,
                long: f.int("damage_long")?,
                extreme: f.int("damage_extreme")?,
                ..Damage::default()
            },
            pilot: Pilot {
                name: f.text("pilot_name"),
                piloting: f.int("pilot_piloting")?,
                gunnery: f.int("pilot_gunnery")?,
                wounds: f.int("pilot_wounds")?,
                ..Pilot::default()
            },
        })
    }

    /// Overwrite every modelled field of `member` except `uuid` and `move`.
    ///
    /// Unmodelled keys, including those nested in `damage` and `pilot`, are
    /// left as they are.
    pub(crate) fn write_into(&self, member: &mut Member) {
        member.class = self.class.clone();
        member.variant = self.variant.clone();
        member.name = self.name.clone();
        member.custom_name = self.custom_name.clone();
        member.classification = self.classification.clone();
        member.date_introduced = self.date_introduced.clone();
        member.tmm = self.tmm;
        member.tonnage = self.tonnage;
        member.tro = self.tro.clone();
        member.role = self.role.clone();
        member.threshold = self.threshold;
        member.cost_cr = self.cost_cr;
        member.mul_id = self.mul_id;
        member.base_points = self.base_points;
        member.current_skill = self.current_skill;
        member.overheat = self.overheat;
        member.structure = self.structure;
        member.armor = self.armor;
        member.unit_type = self.unit_type.clone();
        member.size = self.size;
        member.show_details = self.show_details;
        member.image_url = self.image_url.clone();
        member.current_heat = self.current_heat;
        member.round_heat = self.round_heat;
        member.abilities = self.abilities.clone();
        member.jump_move = self.jump_move;
        member.damage.short = self.damage.short;
        member.damage.medium = self.damage.medium;
        member.damage.long = self.damage.long;
        member.damage.extreme = self.damage.extreme;
        member.pilot.name = self.pilot.name.clone();
        member.pilot.piloting = self.pilot.piloting;
        member.pilot.gunnery = self.pilot.gunnery;
        member.pilot.wounds = self.pilot.wounds;
    }

    /// Replace `move` with the submitted entry when there is one.
    ///
    /// Unmodelled keys of the stored first entry carry over to the new one.
    pub(crate) fn write_move_into(&self, member: &mut Member) {
        let Some(mv) = &self.movement else {
            return;
        };
        let mut entry = mv.clone();
        if let Some(stored) = member.movement.first() {
            entry.extra = stored.extra.clone();
        }
        member.movement = vec![entry];
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// Group metadata as submitted by the create and edit forms.
///
/// `None` means the field was not submitted at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupInput {
    pub name: Option<String>,
    pub formation_bonus: Option<String>,
    pub group_label: Option<String>,
    /// Only used on create.
    pub filename: Option<String>,
}

impl GroupInput {
    pub fn from_fields(f: &FormFields) -> Self {
        Self {
            name: f.get("name").map(str::to_string),
            formation_bonus: f.get("formationBonus").map(str::to_string),
            group_label: f.get("groupLabel").map(str::to_string),
            filename: f.present("filename").map(str::to_string),
        }
    }
}

/// Target of a copy operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyInput {
    pub new_filename: String,
    /// Give every member of the copy a fresh uuid.
    pub update_member_uuids: bool,
}

impl CopyInput {
    pub fn from_fields(f: &FormFields) -> Self {
        Self {
            new_filename: f.text("new_filename"),
            update_member_uuids: f.flag("update_member_uuids"),
        }
    }
}

/// Target of a rename operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameInput {
    pub new_filename: String,
}

impl RenameInput {
    pub fn from_fields(f: &FormFields) -> Self {
        Self {
            new_filename: f.text("new_filename"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_form_yields_default_table() {
        let input = MemberInput::from_fields(&FormFields::new()).expect("coerce");
        assert_eq!(input.tmm, 0.0);
        assert_eq!(input.tonnage, 0.0);
        assert_eq!(input.cost_cr, 0.0);
        assert_eq!(input.current_skill, 4);
        assert_eq!(input.size, 1);
        assert_eq!(input.pilot.piloting, 4);
        assert_eq!(input.pilot.gunnery, 4);
        assert_eq!(input.pilot.wounds, 0);
        assert_eq!(input.damage, Damage::default());
        assert!(!input.show_details);
        assert!(input.abilities.is_empty());
        assert!(input.movement.is_none());
        assert_eq!(input.name, "");
    }

    #[test]
    fn blank_numbers_take_defaults() {
        let input = MemberInput::from_fields(&fields(&[
            ("tmm", ""),
            ("currentSkill", "  "),
            ("size", ""),
        ]))
        .expect("coerce");
        assert_eq!(input.tmm, 0.0);
        assert_eq!(input.current_skill, 4);
        assert_eq!(input.size, 1);
    }

    #[test]
    fn explicit_zero_is_not_replaced_by_default() {
        let input = MemberInput::from_fields(&fields(&[("currentSkill", "0"), ("size", "0")]))
            .expect("coerce");
        assert_eq!(input.current_skill, 0);
        assert_eq!(input.size, 0);
    }

    #[test]
    fn numbers_are_trimmed_and_parsed() {
        let input = MemberInput::from_fields(&fields(&[
            ("tonnage", " 100 "),
            ("tmm", "1.5"),
            ("armor", "+10"),
            ("costCR", "1e6"),
        ]))
        .expect("coerce");
        assert_eq!(input.tonnage, 100.0);
        assert_eq!(input.tmm, 1.5);
        assert_eq!(input.armor, 10);
        assert_eq!(input.cost_cr, 1_000_000.0);
    }

    #[test]
    fn malformed_int_is_rejected_naming_the_field() {
        let err = MemberInput::from_fields(&fields(&[("armor", "ten")])).expect_err("must fail");
        match err {
            AppError::InvalidFormat(msg) => assert!(msg.contains("armor"), "got: {msg}"),
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn fractional_int_is_rejected() {
        let result = MemberInput::from_fields(&fields(&[("size", "2.5")]));
        assert!(matches!(result, Err(AppError::InvalidFormat(_))));
    }

    #[test]
    fn non_finite_float_is_rejected() {
        for raw in ["inf", "NaN", "-infinity"] {
            let result = MemberInput::from_fields(&fields(&[("tonnage", raw)]));
            assert!(
                matches!(result, Err(AppError::InvalidFormat(_))),
                "{raw} must be rejected"
            );
        }
    }

    #[test]
    fn abilities_are_split_trimmed_and_filtered() {
        assert_eq!(parse_abilities("Jump, Stealth, "), vec!["Jump", "Stealth"]);
        assert_eq!(parse_abilities(" , ,"), Vec::<String>::new());
        assert_eq!(parse_abilities("CASE"), vec!["CASE"]);
    }

    #[test]
    fn show_details_requires_on() {
        assert!(fields(&[("showDetails", "on")]).flag("showDetails"));
        assert!(!fields(&[("showDetails", "true")]).flag("showDetails"));
        assert!(!FormFields::new().flag("showDetails"));
    }

    #[test]
    fn move_entry_only_when_move_value_present() {
        let without = MemberInput::from_fields(&fields(&[("move_current", "4")])).expect("coerce");
        assert!(without.movement.is_none());

        let with = MemberInput::from_fields(&fields(&[("move_value", "8"), ("move_current", "6")]))
            .expect("coerce");
        assert_eq!(
            with.movement,
            Some(MoveEntry {
                distance: 8,
                current_move: 6,
                move_type: "Walk".to_string(),
                ..MoveEntry::default()
            })
        );

        let jump = MemberInput::from_fields(&fields(&[("move_value", "0"), ("move_type", "Jump")]))
            .expect("coerce");
        assert_eq!(jump.movement.map(|m| m.move_type), Some("Jump".to_string()));
    }

    #[test]
    fn prefill_round_trips_through_coercion() {
        let member = Member {
            uuid: "m-1".to_string(),
            name: "Atlas".to_string(),
            tonnage: 100.0,
            tmm: 1.5,
            show_details: true,
            abilities: vec!["ENE".to_string(), "IF1".to_string()],
            movement: vec![MoveEntry {
                distance: 6,
                current_move: 4,
                move_type: "Walk".to_string(),
                ..MoveEntry::default()
            }],
            round_heat: 2,
            ..Member::default()
        };
        let input = MemberInput::from_fields(&FormFields::from_member(&member)).expect("coerce");
        let mut rebuilt = Member {
            uuid: member.uuid.clone(),
            movement: input.movement.clone().into_iter().collect(),
            ..Member::default()
        };
        input.write_into(&mut rebuilt);
        assert_eq!(rebuilt, member);
    }

    #[test]
    fn group_input_distinguishes_missing_from_blank() {
        let missing = GroupInput::from_fields(&FormFields::new());
        assert_eq!(missing.name, None);
        let blank = GroupInput::from_fields(&fields(&[("name", ""), ("filename", " ")]));
        assert_eq!(blank.name.as_deref(), Some(""));
        assert_eq!(blank.filename, None);
    }

    #[test]
    fn copy_input_reads_checkbox() {
        let input = CopyInput::from_fields(&fields(&[
            ("new_filename", "beta"),
            ("update_member_uuids", "on"),
        ]));
        assert_eq!(input.new_filename, "beta");
        assert!(input.update_member_uuids);
    }
}
