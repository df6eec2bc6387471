//! Room graph storage
//!
//! Rooms live in an arena addressed by dense node handles (their position in
//! insertion order). A separate index maps the game's external ids onto those
//! handles; handles never leave this crate.
//!
//! Each room owns its outgoing exits as an ordered map keyed by destination
//! handle, so a room has at most one exit toward any other room.

use crate::direction::{self, Coords};
use crate::error::MapError;
use crate::room_id::{ExternalId, RoomId};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Dense handle of a room inside one graph instance.
pub(crate) type NodeIndex = usize;

/// A directed, keyword-labelled connection to another room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Exit {
    keyword: String,
    weight: u32,
    pub(crate) data: Vec<u8>,
}

impl Exit {
    pub(crate) fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let weight = direction::weight(&keyword);
        Exit {
            keyword,
            weight,
            data: Vec::new(),
        }
    }

    pub(crate) fn keyword(&self) -> &str {
        &self.keyword
    }

    pub(crate) fn weight(&self) -> u32 {
        self.weight
    }

    /// Swap in a different keyword; weight follows the keyword.
    pub(crate) fn rename(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
        self.weight = direction::weight(&self.keyword);
    }
}

/// One game location.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Room<K> {
    pub(crate) id: K,
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) coords: Coords,
    pub(crate) exits: IndexMap<NodeIndex, Exit>,
}

impl<K> Room<K> {
    pub(crate) fn new(id: K, coords: Coords) -> Self {
        Room {
            id,
            name: String::new(),
            data: Vec::new(),
            coords,
            exits: IndexMap::new(),
        }
    }
}

/// The room map: rooms, exits between them and one map-wide data blob.
///
/// Single writer: mutation needs `&mut self`, and nothing here is internally
/// synchronized.
#[derive(Debug, Clone)]
pub struct RoomGraph<K = RoomId> {
    pub(crate) rooms: Vec<Room<K>>,
    pub(crate) ids: HashMap<K, NodeIndex>,
    pub(crate) map_data: Vec<u8>,
}

// The id index is derived from the rooms, so it takes no part in equality.
impl<K: ExternalId> PartialEq for RoomGraph<K> {
    fn eq(&self, other: &Self) -> bool {
        self.rooms == other.rooms && self.map_data == other.map_data
    }
}

impl<K: ExternalId> Default for RoomGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ExternalId> RoomGraph<K> {
    /// Create an empty map
    pub fn new() -> Self {
        RoomGraph {
            rooms: Vec::new(),
            ids: HashMap::new(),
            map_data: Vec::new(),
        }
    }

    pub(crate) fn node(&self, id: &K) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    fn room(&self, id: &K) -> Option<&Room<K>> {
        self.node(id).map(|n| &self.rooms[n])
    }

    /// Look up a room's handle, creating the room at `coords` if it is new.
    ///
    /// Returns the handle and whether the room was created by this call.
    pub(crate) fn resolve_or_insert(&mut self, id: &K, coords: Coords) -> (NodeIndex, bool) {
        if let Some(n) = self.node(id) {
            return (n, false);
        }
        let n = self.rooms.len();
        self.rooms.push(Room::new(id.clone(), coords));
        self.ids.insert(id.clone(), n);
        (n, true)
    }

    /// Number of rooms on the map
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of exits across all rooms
    pub fn exit_count(&self) -> usize {
        self.rooms.iter().map(|r| r.exits.len()).sum()
    }

    pub fn contains_room(&self, id: &K) -> bool {
        self.ids.contains_key(id)
    }

    /// Display name of a room, or "" for an unknown room
    pub fn room_name(&self, id: &K) -> &str {
        self.room(id).map(|r| r.name.as_str()).unwrap_or("")
    }

    /// Caller data attached to a room, or nothing for an unknown room
    pub fn room_data(&self, id: &K) -> &[u8] {
        self.room(id).map(|r| r.data.as_slice()).unwrap_or(&[])
    }

    /// Coordinates of a room, or (0, 0, 0) for an unknown room
    pub fn room_coords(&self, id: &K) -> Coords {
        self.room(id).map(|r| r.coords).unwrap_or((0, 0, 0))
    }

    /// All exits of a room as keyword -> destination id.
    ///
    /// Empty for an unknown room.
    pub fn room_exits(&self, id: &K) -> BTreeMap<String, K> {
        let mut out = BTreeMap::new();
        if let Some(room) = self.room(id) {
            for (&dest, exit) in &room.exits {
                out.insert(exit.keyword.clone(), self.rooms[dest].id.clone());
            }
        }
        out
    }

    /// Every room whose name contains `needle` (case-sensitive), as id -> name.
    pub fn find_rooms_by_name(&self, needle: &str) -> BTreeMap<K, String> {
        self.rooms
            .iter()
            .filter(|r| r.name.contains(needle))
            .map(|r| (r.id.clone(), r.name.clone()))
            .collect()
    }

    /// Replace a room's data blob. The room must already be on the map.
    pub fn set_room_data(&mut self, id: &K, data: impl Into<Vec<u8>>) -> Result<(), MapError> {
        let n = self
            .node(id)
            .ok_or_else(|| MapError::RoomNotFound(id.to_string()))?;
        self.rooms[n].data = data.into();
        Ok(())
    }

    /// Data attached to the exit `from -> to`, or nothing if there is no such exit
    pub fn exit_data(&self, from: &K, to: &K) -> &[u8] {
        self.exit(from, to).map(|e| e.data.as_slice()).unwrap_or(&[])
    }

    /// Replace the data blob of the exit `from -> to`.
    ///
    /// Both rooms must be known and the exit must exist.
    pub fn set_exit_data(
        &mut self,
        from: &K,
        to: &K,
        data: impl Into<Vec<u8>>,
    ) -> Result<(), MapError> {
        let source = self
            .node(from)
            .ok_or_else(|| MapError::RoomNotFound(from.to_string()))?;
        let dest = self
            .node(to)
            .ok_or_else(|| MapError::RoomNotFound(to.to_string()))?;
        let exit = self.rooms[source]
            .exits
            .get_mut(&dest)
            .ok_or_else(|| MapError::ExitNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        exit.data = data.into();
        Ok(())
    }

    pub fn map_data(&self) -> &[u8] {
        &self.map_data
    }

    pub fn set_map_data(&mut self, data: impl Into<Vec<u8>>) {
        self.map_data = data.into();
    }

    fn exit(&self, from: &K, to: &K) -> Option<&Exit> {
        let source = self.node(from)?;
        let dest = self.node(to)?;
        self.rooms[source].exits.get(&dest)
    }
}

impl<K: ExternalId> fmt::Display for RoomGraph<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Room map: {} rooms, {} exits, {} bytes of map data",
            self.room_count(),
            self.exit_count(),
            self.map_data.len()
        )
    }
}
