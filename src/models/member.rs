//! Member data model: one unit and its pilot inside a group's `members` array.
//!
//! Keys are written in the same order the fields are declared, which is the
//! order roster files have always used. Keys this model does not know about
//! are kept in [`Member::extra`] and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default movement mode when a move entry is created without one.
pub const DEFAULT_MOVE_TYPE: &str = "Walk";

/// One entry of a member's `move` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveEntry {
    /// Base movement in inches.
    #[serde(rename = "move")]
    pub distance: i64,
    pub current_move: i64,
    /// Movement mode (e.g. `"Walk"`, `"Jump"`, `"Tracked"`).
    #[serde(rename = "type")]
    pub move_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for MoveEntry {
    fn default() -> Self {
        Self {
            distance: 0,
            current_move: 0,
            move_type: DEFAULT_MOVE_TYPE.to_string(),
            extra: Map::new(),
        }
    }
}

/// Damage values per range bracket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Damage {
    pub short: i64,
    pub medium: i64,
    pub long: i64,
    pub extreme: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The pilot (or crew) assigned to a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pilot {
    pub name: String,
    pub piloting: i64,
    pub gunnery: i64,
    pub wounds: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Pilot {
    fn default() -> Self {
        Self {
            name: String::new(),
            piloting: 4,
            gunnery: 4,
            wounds: 0,
            extra: Map::new(),
        }
    }
}

/// A unit record in a group roster.
///
/// Missing keys load with the same defaults the member form applies, so a
/// hand-edited or older file never fails to load for lack of a stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    /// Identifier, unique within the owning group.
    pub uuid: String,
    pub class: String,
    pub variant: String,
    pub name: String,
    pub custom_name: String,
    pub classification: String,
    pub date_introduced: String,
    /// Target movement modifier.
    pub tmm: f64,
    pub tonnage: f64,
    /// Technical readout reference.
    pub tro: String,
    pub role: String,
    pub threshold: i64,
    #[serde(rename = "costCR")]
    pub cost_cr: f64,
    /// Master Unit List identifier.
    #[serde(rename = "mulID")]
    pub mul_id: i64,
    pub base_points: i64,
    pub current_skill: i64,
    pub overheat: i64,
    pub structure: i64,
    pub armor: i64,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub size: i64,
    pub show_details: bool,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub current_heat: i64,
    pub round_heat: i64,
    pub abilities: Vec<String>,
    pub jump_move: i64,
    /// At most one entry in practice; kept as an array for file compatibility.
    #[serde(rename = "move")]
    pub movement: Vec<MoveEntry>,
    pub damage: Damage,
    pub pilot: Pilot,
    /// Keys not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Member {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            class: String::new(),
            variant: String::new(),
            name: String::new(),
            custom_name: String::new(),
            classification: String::new(),
            date_introduced: String::new(),
            tmm: 0.0,
            tonnage: 0.0,
            tro: String::new(),
            role: String::new(),
            threshold: 0,
            cost_cr: 0.0,
            mul_id: 0,
            base_points: 0,
            current_skill: 4,
            overheat: 0,
            structure: 0,
            armor: 0,
            unit_type: String::new(),
            size: 1,
            show_details: false,
            image_url: String::new(),
            current_heat: 0,
            round_heat: 0,
            abilities: Vec::new(),
            jump_move: 0,
            movement: Vec::new(),
            damage: Damage::default(),
            pilot: Pilot::default(),
            extra: Map::new(),
        }
    }
}
