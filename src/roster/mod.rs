// Roster domain: positions, players, and slot assignment.

pub mod player;
pub mod position;
pub mod slots;

pub use player::Player;
pub use position::Position;
pub use slots::{Roster, SlotKind, StarterSlot};
