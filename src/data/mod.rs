//! Static lookup tables for the garden save-code format.
//!
//! These tables are data, not logic: they must match the external planner's
//! latest code tables exactly for decode compatibility. Older save-code
//! versions (and their table drift) are out of scope.

pub mod codes;

pub use codes::*;

/// Crops offered by the quick-add list on the tracker screen, in the order
/// they are bound to the number row.
pub fn trackable_crops() -> Vec<&'static str> {
    CROP_CODES
        .iter()
        .filter(|c| c.code != NO_CROP_CODE)
        .map(|c| c.name)
        .collect()
}
