//! Apartment description files.
//!
//! ```toml
//! cost = 1500
//!
//! [[rooms]]
//! name = "bedroom"
//! size = 100
//!
//! [[rooms]]
//! name = "kitchen"
//! size = 50
//! sharing = true
//!
//! [[occupants]]
//! name = "alice"
//! rooms = ["bedroom"]
//!
//! [[occupants]]
//! name = "bob"
//! ```

use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::apartment::ApartmentInput;
use crate::model::entity::{Amount, Occupant, RoomName, RoomSpec, SquareFeet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApartmentFile {
    /// Total monthly rent.
    pub cost: Amount,

    /// Number of people living there. Defaults to the number of occupants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<usize>,

    #[serde(default)]
    pub rooms: Vec<RoomEntry>,

    #[serde(default)]
    pub occupants: Vec<OccupantEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomEntry {
    pub name: RoomName,
    pub size: SquareFeet,
    #[serde(default)]
    pub sharing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccupantEntry {
    pub name: Occupant,
    /// Rooms this occupant pays for on their own or with other claimants.
    #[serde(default)]
    pub rooms: Vec<RoomName>,
}

impl ApartmentFile {
    /// Load an apartment from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse an apartment from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or names a room or occupant
    /// twice.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ApartmentFile = toml::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rooms = self.rooms.iter().map(|room| &room.name).duplicates().join(", ");
        if !rooms.is_empty() {
            return Err(ConfigError::Validation(format!("rooms listed more than once: {rooms}")));
        }
        let occupants = self.occupants.iter().map(|occupant| &occupant.name).duplicates().join(", ");
        if !occupants.is_empty() {
            return Err(ConfigError::Validation(format!("occupants listed more than once: {occupants}")));
        }
        Ok(())
    }

    /// Hands the description to the allocator. Range checks happen there.
    pub fn into_input(self) -> ApartmentInput {
        let num_people = self.people.unwrap_or(self.occupants.len());
        ApartmentInput {
            rooms: self
                .rooms
                .into_iter()
                .map(|room| (room.name, RoomSpec { size: room.size, sharing: room.sharing }))
                .collect(),
            assignments: self
                .occupants
                .into_iter()
                .map(|occupant| (occupant.name, occupant.rooms))
                .collect(),
            apt_cost: self.cost,
            num_people,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read apartment file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse apartment file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize apartment file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("apartment file is invalid: {0}")]
    Validation(String),
}
