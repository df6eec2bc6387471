//! Room map archives
//!
//! The whole map is saved as one TOML document:
//!
//! ```text
//! format = 1
//! map_data = "..."
//!
//! [[rooms]]        # one table per room, in node order
//! id = 1
//! name = "Temple Square"
//! data = ""
//! x = 0
//! y = 0
//! z = 0
//!
//! [[exits]]        # grouped by source room
//! version = 1
//! from = 0         # position of the source room in `rooms`
//! to = 1
//! keyword = "n"
//! data = ""
//! ```
//!
//! Exit records carry their own version. Version 0 records predate exit data
//! and only the keyword is read from them. Exit weights are never stored; they
//! are derived from the keyword again on load.
//!
//! Data blobs are raw bytes. A blob that is valid UTF-8 is written as a TOML
//! string; any other blob is written as an array of byte values.

use crate::error::MapError;
use crate::room_graph::{Exit, Room, RoomGraph};
use crate::room_id::ExternalId;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Version of the archive document layout.
pub const ARCHIVE_FORMAT: u32 = 1;

/// Version written into every exit record.
pub const EXIT_RECORD_VERSION: u32 = 1;

// Defaults are given as paths: a bare `default` would demand `K: Default`.
#[derive(Debug, Serialize, Deserialize)]
struct Archive<K> {
    format: u32,
    #[serde(default = "Vec::new", with = "blob")]
    map_data: Vec<u8>,
    #[serde(default = "Vec::new")]
    rooms: Vec<RoomRecord<K>>,
    #[serde(default = "Vec::new")]
    exits: Vec<ExitRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoomRecord<K> {
    id: K,
    #[serde(default)]
    name: String,
    #[serde(default = "Vec::new", with = "blob")]
    data: Vec<u8>,
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExitRecord {
    #[serde(default)]
    version: u32,
    from: usize,
    to: usize,
    keyword: String,
    #[serde(default, with = "blob")]
    data: Vec<u8>,
}

mod blob {
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_seq(bytes),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_any(BlobVisitor)
    }

    struct BlobVisitor;

    impl<'de> Visitor<'de> for BlobVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or an array of byte values")
        }

        fn visit_str<E: de::Error>(self, text: &str) -> Result<Vec<u8>, E> {
            Ok(text.as_bytes().to_vec())
        }

        fn visit_string<E: de::Error>(self, text: String) -> Result<Vec<u8>, E> {
            Ok(text.into_bytes())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<u8>, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            Ok(bytes)
        }
    }
}

impl<K: ExternalId> RoomGraph<K> {
    /// Restore a map from the output of [`RoomGraph::serialize`].
    ///
    /// An empty string gives an empty map. Anything else must be a well-formed
    /// archive; otherwise nothing is built and `CorruptArchive` is returned.
    pub fn from_serialized(serialized: &str) -> Result<Self, MapError> {
        if serialized.is_empty() {
            return Ok(Self::new());
        }

        let archive: Archive<K> = toml::from_str(serialized).map_err(|e| {
            warn!("Rejecting room map archive: {}", e);
            MapError::from(e)
        })?;
        let graph = Self::from_archive(archive).map_err(|e| {
            warn!("Rejecting room map archive: {}", e);
            e
        })?;

        info!(
            "Loaded room map: {} rooms, {} exits",
            graph.room_count(),
            graph.exit_count()
        );
        Ok(graph)
    }

    fn from_archive(archive: Archive<K>) -> Result<Self, MapError> {
        if archive.format > ARCHIVE_FORMAT {
            return Err(MapError::corrupt(format!(
                "archive format {} is newer than supported format {}",
                archive.format, ARCHIVE_FORMAT
            )));
        }

        let mut graph = Self::new();
        graph.map_data = archive.map_data;

        // Node handles follow storage order, which rebuilds the id index too.
        for record in archive.rooms {
            let node = graph.rooms.len();
            if graph.ids.insert(record.id.clone(), node).is_some() {
                return Err(MapError::corrupt(format!(
                    "room {} is stored twice",
                    record.id
                )));
            }
            let mut room = Room::new(record.id, (record.x, record.y, record.z));
            room.name = record.name;
            room.data = record.data;
            graph.rooms.push(room);
        }

        let count = graph.rooms.len();
        for (i, record) in archive.exits.into_iter().enumerate() {
            if record.version > EXIT_RECORD_VERSION {
                return Err(MapError::corrupt(format!(
                    "exit record {} has unsupported version {}",
                    i, record.version
                )));
            }
            if record.from >= count || record.to >= count {
                return Err(MapError::corrupt(format!(
                    "exit record {} joins rooms {} and {} but only {} rooms are stored",
                    i, record.from, record.to, count
                )));
            }

            let mut exit = Exit::new(record.keyword);
            if record.version >= 1 {
                exit.data = record.data;
            }

            let exits = &mut graph.rooms[record.from].exits;
            if exits.contains_key(&record.to) {
                return Err(MapError::corrupt(format!(
                    "exit record {} duplicates the exit from room {} to room {}",
                    i, record.from, record.to
                )));
            }
            exits.insert(record.to, exit);
        }

        Ok(graph)
    }

    /// Save the whole map (rooms, exits and map data) as one string.
    ///
    /// Fails only when an id type has no TOML representation (for example an
    /// integer beyond `i64`).
    pub fn serialize(&self) -> Result<String, MapError> {
        let mut exits = Vec::with_capacity(self.exit_count());
        for (from, room) in self.rooms.iter().enumerate() {
            for (&to, exit) in &room.exits {
                exits.push(ExitRecord {
                    version: EXIT_RECORD_VERSION,
                    from,
                    to,
                    keyword: exit.keyword().to_string(),
                    data: exit.data.clone(),
                });
            }
        }

        let archive = Archive {
            format: ARCHIVE_FORMAT,
            map_data: self.map_data.clone(),
            rooms: self
                .rooms
                .iter()
                .map(|r| RoomRecord {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    data: r.data.clone(),
                    x: r.coords.0,
                    y: r.coords.1,
                    z: r.coords.2,
                })
                .collect(),
            exits,
        };

        let serialized =
            toml::to_string(&archive).map_err(|e| MapError::Unencodable(e.to_string()))?;
        info!(
            "Saved room map: {} rooms, {} exits, {} bytes",
            self.room_count(),
            self.exit_count(),
            serialized.len()
        );
        Ok(serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_id::RoomId;
    use std::collections::BTreeMap;
    use test_log::test;

    fn exits(list: &[(&str, i64)]) -> BTreeMap<String, RoomId> {
        list.iter()
            .map(|&(kw, id)| (kw.to_string(), RoomId::from(id)))
            .collect()
    }

    fn id(n: i64) -> RoomId {
        RoomId::from(n)
    }

    fn sample() -> RoomGraph {
        let mut g = RoomGraph::new();
        g.observe_room(&id(1), "Temple Square", "{\"safe\":true}", &exits(&[("n", 2), ("open gate", 3)]));
        g.observe_room(&id(2), "Temple Steps", "", &exits(&[("s", 1), ("u", 4)]));
        g.set_exit_data(&id(1), &id(3), "gate: locked at night").unwrap();
        g.set_map_data("world=midgaard\nrev=3");
        g
    }

    const LEGACY: &str = r#"
format = 1
map_data = "old"

[[rooms]]
id = 10
name = "Gate"
data = ""
x = 0
y = 0
z = 0

[[rooms]]
id = "crypt"
name = "Crypt"
data = "dark"
x = 0
y = 0
z = -1

[[exits]]
version = 0
from = 0
to = 1
keyword = "d"
data = "not read from version 0"

[[exits]]
version = 1
from = 1
to = 0
keyword = "climb stairs"
data = "slippery"
"#;

    #[test]
    fn test_empty_string_is_empty_map() {
        let g: RoomGraph = RoomGraph::from_serialized("").unwrap();
        assert_eq!(g.room_count(), 0);
        assert!(g.map_data().is_empty());
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let g = sample();
        let saved = g.serialize().unwrap();
        let restored: RoomGraph = RoomGraph::from_serialized(&saved).unwrap();
        assert_eq!(restored, g);
        assert_eq!(restored.serialize().unwrap(), saved);
    }

    #[test]
    fn test_round_trip_keeps_every_attribute() {
        let g = sample();
        let restored: RoomGraph = RoomGraph::from_serialized(&g.serialize().unwrap()).unwrap();

        assert_eq!(restored.room_name(&id(2)), "Temple Steps");
        assert_eq!(restored.room_data(&id(1)), b"{\"safe\":true}");
        assert_eq!(restored.room_coords(&id(4)), (0, 1, 1));
        assert_eq!(restored.room_exits(&id(1)), g.room_exits(&id(1)));
        assert_eq!(restored.exit_data(&id(1), &id(3)), b"gate: locked at night");
        assert_eq!(restored.map_data(), b"world=midgaard\nrev=3");
        assert_eq!(restored.find_path(&id(2), &id(3)), vec!["s", "open gate"]);
    }

    #[test]
    fn test_empty_map_round_trip() {
        let g: RoomGraph = RoomGraph::new();
        let saved = g.serialize().unwrap();
        assert!(!saved.is_empty());
        let restored: RoomGraph = RoomGraph::from_serialized(&saved).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let g: RoomGraph = RoomGraph::from_serialized("format = 1\n").unwrap();
        assert_eq!(g.room_count(), 0);
        assert_eq!(g.exit_count(), 0);
        assert!(g.map_data().is_empty());

        let one_room = "format = 1\n[[rooms]]\nid = \"hall\"\nx = 0\ny = 0\nz = 0\n";
        let g: RoomGraph = RoomGraph::from_serialized(one_room).unwrap();
        assert!(g.contains_room(&RoomId::from("hall")));
        assert!(g.room_data(&RoomId::from("hall")).is_empty());
    }

    #[test]
    fn test_legacy_exit_records_and_weights() {
        let g: RoomGraph = RoomGraph::from_serialized(LEGACY).unwrap();
        let crypt = RoomId::from("crypt");

        assert_eq!(g.room_count(), 2);
        assert_eq!(g.room_exits(&id(10))["d"], crypt);
        assert!(g.exit_data(&id(10), &crypt).is_empty());
        assert_eq!(g.exit_data(&crypt, &id(10)), b"slippery");
        assert_eq!(g.room_coords(&crypt), (0, 0, -1));

        assert_eq!(g.rooms[0].exits[&1].weight(), 1);
        assert_eq!(g.rooms[1].exits[&0].weight(), 2);
    }

    #[test]
    fn test_rewritten_legacy_archive_uses_current_version() {
        let g: RoomGraph = RoomGraph::from_serialized(LEGACY).unwrap();
        let saved = g.serialize().unwrap();
        assert!(!saved.contains("version = 0"));
        assert!(saved.contains("version = 1"));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        for bad in ["not a map", "format = \"one\"", "[[rooms]]\nid = 1", "\u{0}"] {
            let result: Result<RoomGraph, MapError> = RoomGraph::from_serialized(bad);
            assert!(
                matches!(result, Err(MapError::CorruptArchive(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_structural_errors_are_corrupt() {
        let duplicate_room = "format = 1\n[[rooms]]\nid = 1\nx = 0\ny = 0\nz = 0\n[[rooms]]\nid = 1\nx = 1\ny = 0\nz = 0\n";
        let dangling_exit = "format = 1\n[[rooms]]\nid = 1\nx = 0\ny = 0\nz = 0\n[[exits]]\nversion = 1\nfrom = 0\nto = 3\nkeyword = \"n\"\n";
        let duplicate_exit = "format = 1\n[[rooms]]\nid = 1\nx = 0\ny = 0\nz = 0\n[[rooms]]\nid = 2\nx = 0\ny = 1\nz = 0\n[[exits]]\nfrom = 0\nto = 1\nkeyword = \"n\"\n[[exits]]\nfrom = 0\nto = 1\nkeyword = \"climb\"\n";
        let future_exit = "format = 1\n[[rooms]]\nid = 1\nx = 0\ny = 0\nz = 0\n[[exits]]\nversion = 7\nfrom = 0\nto = 0\nkeyword = \"n\"\n";
        let future_format = "format = 9\n";

        for bad in [duplicate_room, dangling_exit, duplicate_exit, future_exit, future_format] {
            let result: Result<RoomGraph, MapError> = RoomGraph::from_serialized(bad);
            assert!(
                matches!(result, Err(MapError::CorruptArchive(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_storage_order_defines_handles() {
        let mut g = RoomGraph::new();
        g.observe_room(&id(30), "C", "", &exits(&[("w", 20)]));
        g.observe_room(&id(20), "B", "", &exits(&[("w", 10)]));
        let restored: RoomGraph = RoomGraph::from_serialized(&g.serialize().unwrap()).unwrap();
        assert_eq!(restored.ids[&id(30)], 0);
        assert_eq!(restored.ids[&id(20)], 1);
        assert_eq!(restored.ids[&id(10)], 2);
    }

    #[test]
    fn test_integer_keyed_graph() {
        let mut g: RoomGraph<i64> = RoomGraph::new();
        let mut seen = BTreeMap::new();
        seen.insert("e".to_string(), -5);
        g.observe_room(&-4, "West", "", &seen);
        let restored: RoomGraph<i64> = RoomGraph::from_serialized(&g.serialize().unwrap()).unwrap();
        assert_eq!(restored.room_coords(&-5), (1, 0, 0));
        assert_eq!(restored.find_path(&-4, &-5), vec!["e"]);
    }

    #[test]
    fn test_binary_blobs_round_trip() {
        let mut g = sample();
        g.set_room_data(&id(2), vec![0xff, 0x00, 0xfe]).unwrap();
        g.set_exit_data(&id(1), &id(2), vec![0xc3]).unwrap();
        g.set_map_data(vec![0x80, b'a']);

        let saved = g.serialize().unwrap();
        let restored: RoomGraph = RoomGraph::from_serialized(&saved).unwrap();
        assert_eq!(restored.room_data(&id(2)), b"\xff\x00\xfe");
        assert_eq!(restored.exit_data(&id(1), &id(2)), b"\xc3");
        assert_eq!(restored.map_data(), b"\x80a");
        // text blobs stay readable in the archive
        assert!(saved.contains("gate: locked at night"));
        assert_eq!(restored.serialize().unwrap(), saved);
    }

    #[test]
    fn test_blob_byte_arrays_are_read() {
        let archive = "format = 1\nmap_data = [104, 105]\n[[rooms]]\nid = 1\ndata = [0, 255]\nx = 0\ny = 0\nz = 0\n";
        let g: RoomGraph = RoomGraph::from_serialized(archive).unwrap();
        assert_eq!(g.map_data(), b"hi");
        assert_eq!(g.room_data(&id(1)), b"\x00\xff");

        let out_of_range = archive.replace("255", "256");
        let result: Result<RoomGraph, MapError> = RoomGraph::from_serialized(&out_of_range);
        assert!(matches!(result, Err(MapError::CorruptArchive(_))));
    }

    #[test]
    fn test_id_without_toml_form_is_unencodable() {
        let mut g: RoomGraph<u64> = RoomGraph::new();
        let mut seen = BTreeMap::new();
        seen.insert("n".to_string(), u64::MAX);
        g.observe_room(&1, "Edge of the World", "", &seen);
        assert!(matches!(g.serialize(), Err(MapError::Unencodable(_))));

        let mut small: RoomGraph<u64> = RoomGraph::new();
        small.observe_room(&1, "Edge of the World", "", &BTreeMap::new());
        assert!(small.serialize().is_ok());
    }
}
