pub mod group;
pub mod member;

pub use group::{timestamp_now, Group, DEFAULT_GROUP_NAME};
pub use member::{Damage, Member, MoveEntry, Pilot, DEFAULT_MOVE_TYPE};
