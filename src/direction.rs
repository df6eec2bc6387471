//! Direction keywords
//!
//! The ten compass and vertical movement commands are cheaper to walk than
//! arbitrary commands ("open gate", "enter portal") and are the only exits that
//! tell us where the destination room sits relative to the source.

use std::collections::HashMap;

/// Room coordinates as (x, y, z).
pub type Coords = (i32, i32, i32);

/// Step cost of a direction keyword.
pub const DIRECTION_WEIGHT: u32 = 1;

/// Step cost of any other keyword.
pub const COMMAND_WEIGHT: u32 = 2;

lazy_static! {
    pub static ref DIRECTION_OFFSETS: HashMap<&'static str, Coords> = {
        let mut m = HashMap::new();
        m.insert("n", (0, 1, 0));
        m.insert("e", (1, 0, 0));
        m.insert("s", (0, -1, 0));
        m.insert("w", (-1, 0, 0));
        m.insert("u", (0, 0, 1));
        m.insert("d", (0, 0, -1));
        m.insert("ne", (1, 1, 0));
        m.insert("se", (1, -1, 0));
        m.insert("sw", (-1, -1, 0));
        m.insert("nw", (-1, 1, 0));
        m
    };
}

/// Is this keyword one of the ten recognized directions?
pub fn is_direction(keyword: &str) -> bool {
    DIRECTION_OFFSETS.contains_key(keyword)
}

/// Traversal weight of an exit, derived from its keyword alone.
pub fn weight(keyword: &str) -> u32 {
    if is_direction(keyword) {
        DIRECTION_WEIGHT
    } else {
        COMMAND_WEIGHT
    }
}

/// Coordinates of a room reached from `from` via `keyword`.
///
/// Unrecognized keywords lead to a room at the same coordinates.
pub fn step(from: Coords, keyword: &str) -> Coords {
    match DIRECTION_OFFSETS.get(keyword) {
        Some(&(dx, dy, dz)) => (from.0 + dx, from.1 + dy, from.2 + dz),
        None => from,
    }
}
