//! Room map for text-adventure clients
//!
//! Tracks the rooms and exits of a game world as the player discovers them,
//! answers shortest-path queries in exit keywords, and saves the whole map to a
//! string that can be restored later.
//!
//! ```
//! use roommap::{RoomGraph, RoomId};
//! use std::collections::BTreeMap;
//!
//! let mut map = RoomGraph::new();
//! let mut exits = BTreeMap::new();
//! exits.insert("n".to_string(), RoomId::from(2));
//! map.observe_room(&RoomId::from(1), "Start", "", &exits);
//!
//! assert_eq!(map.room_coords(&RoomId::from(2)), (0, 1, 0));
//! assert_eq!(map.find_path(&RoomId::from(1), &RoomId::from(2)), vec!["n"]);
//! ```

#[macro_use]
extern crate lazy_static;

pub mod archive;
pub mod direction;
pub mod error;
mod merge;
mod pathfinder;
pub mod room_graph;
pub mod room_id;
pub mod speedwalk;

pub use direction::Coords;
pub use error::MapError;
pub use room_graph::RoomGraph;
pub use room_id::{ExternalId, RoomId};
pub use speedwalk::speedwalk;
