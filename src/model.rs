pub mod entity {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    pub type Amount = f64;
    pub type SquareFeet = f64;
    pub type Occupant = String;

    /// Case-insensitive room identifier. Stored trimmed and lower-cased.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct RoomName(String);

    impl RoomName {
        /// Returns `None` for blank names.
        pub fn new(raw: &str) -> Option<RoomName> {
            let name = raw.trim().to_lowercase();
            if name.is_empty() {
                None
            } else {
                Some(RoomName(name))
            }
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for RoomName {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.pad(&self.0)
        }
    }

    impl TryFrom<String> for RoomName {
        type Error = String;

        fn try_from(raw: String) -> Result<Self, Self::Error> {
            RoomName::new(&raw).ok_or_else(|| "room name must not be blank".to_string())
        }
    }

    impl From<RoomName> for String {
        fn from(name: RoomName) -> Self {
            name.0
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct RoomSpec {
        pub size: SquareFeet,
        pub sharing: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Room {
        pub name: RoomName,
        pub size: SquareFeet,
        /// Everyone pays for this room, whatever they claimed.
        pub sharing: bool,
        /// Occupants who claimed this room. Always 0 for sharing rooms.
        pub num_share: usize,
        pub total: Amount,
    }
}

pub mod apartment {
    use std::collections::BTreeMap;

    use super::entity::{Amount, Occupant, RoomName, RoomSpec};

    /// An apartment as handed over by a front end, before allocation.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct ApartmentInput {
        pub rooms: BTreeMap<RoomName, RoomSpec>,
        pub assignments: BTreeMap<Occupant, Vec<RoomName>>,
        pub apt_cost: Amount,
        pub num_people: usize,
    }

    impl ApartmentInput {
        pub fn num_rooms(&self) -> usize {
            self.rooms.len()
        }
    }
}
