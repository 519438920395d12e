//! Board data: square variants and the 40-square ring.
//!
//! - `Square` / `SquareKind`: tagged union over property, railroad, utility,
//!   tax, card draw, jail and neutral squares
//! - `Deed`: ownership and mortgage state shared by the ownable variants
//! - `Board`: the fixed layout plus a color-group index

mod layout;
mod square;

pub use layout::{Board, GroupMembers};
pub use square::{ColorGroup, Deed, JailKind, Property, Square, SquareId, SquareKind, Tax, MAX_HOUSES};
