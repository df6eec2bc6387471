// Room map error handling

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    // Archive errors
    CorruptArchive(String),
    Unencodable(String),

    // Mutation of something never observed
    RoomNotFound(String),
    ExitNotFound { from: String, to: String },
}

impl MapError {
    pub fn corrupt(message: impl Into<String>) -> Self {
        MapError::CorruptArchive(message.into())
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MapError::CorruptArchive(msg) => {
                write!(f, "Corrupt map archive: {}", msg)
            }
            MapError::Unencodable(msg) => {
                write!(f, "Room map cannot be archived: {}", msg)
            }
            MapError::RoomNotFound(room) => {
                write!(f, "Room {} is not on the map", room)
            }
            MapError::ExitNotFound { from, to } => {
                write!(f, "No exit from room {} to room {}", from, to)
            }
        }
    }
}

impl std::error::Error for MapError {}

impl From<toml::de::Error> for MapError {
    fn from(error: toml::de::Error) -> Self {
        MapError::corrupt(error.to_string())
    }
}

impl From<MapError> for String {
    fn from(error: MapError) -> String {
        error.to_string()
    }
}
