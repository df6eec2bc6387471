// Room Map - Merging observed rooms
//
// Reconciles one freshly observed room and its visible exits with what the
// map already knows: new rooms and exits are created, exits that vanished are
// pruned, and rooms first seen as exit destinations get coordinates inferred
// from the direction that leads to them.

use crate::direction;
use crate::room_graph::{Exit, RoomGraph};
use crate::room_id::ExternalId;
use log::debug;
use std::collections::{BTreeMap, HashSet};

impl<K: ExternalId> RoomGraph<K> {
    /// Record that room `id` was seen with the given name, data and exits.
    ///
    /// `exits` maps each exit keyword to the id of the room it leads to.
    /// Applying the same observation twice leaves the map unchanged.
    pub fn observe_room(
        &mut self,
        id: &K,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        exits: &BTreeMap<String, K>,
    ) {
        let (source, created) = self.resolve_or_insert(id, (0, 0, 0));
        if created {
            debug!("observe_room: new room {}", id);
        }
        let room = &mut self.rooms[source];
        room.name = name.into();
        room.data = data.into();

        let mut listed = HashSet::with_capacity(exits.len());
        for (keyword, dest_id) in exits {
            let origin = self.rooms[source].coords;
            let (dest, dest_created) =
                self.resolve_or_insert(dest_id, direction::step(origin, keyword));
            if dest_created {
                debug!(
                    "observe_room: discovered room {} via '{}' at {:?}",
                    dest_id, keyword, self.rooms[dest].coords
                );
            }
            listed.insert(dest);

            // The longer keyword wins: "open n;n" is more useful than "n".
            match self.rooms[source].exits.get_mut(&dest) {
                Some(existing) if existing.keyword().len() < keyword.len() => {
                    debug!(
                        "observe_room: exit {} -> {} renamed '{}' -> '{}'",
                        id,
                        dest_id,
                        existing.keyword(),
                        keyword
                    );
                    existing.rename(keyword.as_str());
                }
                Some(_) => {}
                None => {
                    debug!("observe_room: exit {} -> {} via '{}'", id, dest_id, keyword);
                    self.rooms[source].exits.insert(dest, Exit::new(keyword.as_str()));
                }
            }
        }

        let before = self.rooms[source].exits.len();
        self.rooms[source]
            .exits
            .retain(|dest, _| listed.contains(dest));
        let pruned = before - self.rooms[source].exits.len();
        if pruned > 0 {
            debug!("observe_room: pruned {} stale exits from {}", pruned, id);
        }
    }
}
