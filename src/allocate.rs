use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::apartment::ApartmentInput;
use crate::model::entity::{Amount, Occupant, Room, RoomName, RoomSpec, SquareFeet};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AllocError {
    #[error("Invalid apartment: {0}")]
    InvalidApartment(String),
    #[error("{occupant} pays for unknown room '{room}'")]
    UnknownRoom { occupant: Occupant, room: RoomName },
    #[error("Room '{0}' is not shared by everyone and nobody pays for it")]
    OrphanedRoom(RoomName),
    #[error("No apartment has been set")]
    NotInitialized,
}

fn invalid(reason: impl Into<String>) -> AllocError {
    AllocError::InvalidApartment(reason.into())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Allocated apartment. Immutable once built; both pay queries read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Apartment {
    apt_cost: Amount,
    num_people: usize,
    rooms: BTreeMap<RoomName, Room>,
    assignments: BTreeMap<Occupant, BTreeSet<RoomName>>,
}

impl Apartment {
    /// Validates `input` and computes every room total in a single pass.
    ///
    /// Sharing rooms are dropped from each occupant's list, and a room listed
    /// twice by the same occupant counts once.
    pub fn new(input: ApartmentInput) -> Result<Apartment, AllocError> {
        let ApartmentInput { rooms: specs, assignments: claims, apt_cost, num_people } = input;

        if specs.is_empty() {
            return Err(invalid("an apartment needs at least one room"));
        }
        if !is_positive(apt_cost) {
            return Err(invalid(format!("apartment cost must be > 0, got {apt_cost}")));
        }
        if num_people == 0 {
            return Err(invalid("number of people must be > 0"));
        }
        if num_people != claims.len() {
            return Err(invalid(format!(
                "{num_people} people expected but {} room assignments given",
                claims.len()
            )));
        }
        if let Some((name, spec)) = specs.iter().find(|(_, spec)| !is_positive(spec.size)) {
            return Err(invalid(format!("room '{name}' size must be > 0, got {}", spec.size)));
        }
        let total_size: SquareFeet = specs.values().map(|spec| spec.size).sum();
        if !is_positive(total_size) {
            return Err(invalid("total square footage must be > 0"));
        }

        let mut assignments = BTreeMap::new();
        for (occupant, listed) in claims {
            let mut own = BTreeSet::new();
            for room in listed {
                match specs.get(&room) {
                    None => return Err(AllocError::UnknownRoom { occupant, room }),
                    Some(spec) if spec.sharing => {}
                    Some(_) => {
                        own.insert(room);
                    }
                }
            }
            assignments.insert(occupant, own);
        }

        let rooms = specs
            .into_iter()
            .map(|(name, spec)| {
                let num_share = if spec.sharing {
                    0
                } else {
                    assignments.values().filter(|own| own.contains(&name)).count()
                };
                let total = apt_cost * (spec.size / total_size);
                let room = Room { name: name.clone(), size: spec.size, sharing: spec.sharing, num_share, total };
                (name, room)
            })
            .collect::<BTreeMap<_, _>>();

        debug!(
            rooms = rooms.len(),
            people = num_people,
            apt_cost,
            total_size,
            "apartment allocated"
        );
        Ok(Apartment { apt_cost, num_people, rooms, assignments })
    }

    pub fn apt_cost(&self) -> Amount {
        self.apt_cost
    }

    pub fn num_people(&self) -> usize {
        self.num_people
    }

    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn room(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Rooms each occupant pays for individually. Sharing rooms never appear here.
    pub fn assignments(&self) -> &BTreeMap<Occupant, BTreeSet<RoomName>> {
        &self.assignments
    }

    pub fn total_size(&self) -> SquareFeet {
        self.rooms.values().map(|room| room.size).sum()
    }

    /// Combined total of the rooms everyone shares.
    pub fn shared_pool(&self) -> Amount {
        self.rooms.values().filter(|room| room.sharing).map(|room| room.total).sum()
    }

    pub fn per_person_shared_cost(&self) -> Amount {
        let pool = self.shared_pool();
        if pool != 0.0 {
            pool / self.num_people as Amount
        } else {
            0.0
        }
    }

    pub fn room_pay(&self) -> BTreeMap<RoomName, Amount> {
        self.rooms.iter().map(|(name, room)| (name.clone(), room.total)).collect()
    }

    pub fn person_pay(&self) -> Result<BTreeMap<Occupant, Amount>, AllocError> {
        if let Some(orphan) = self.rooms.values().find(|room| !room.sharing && room.num_share == 0) {
            warn!(room = %orphan.name, "room is claimed by nobody");
            return Err(AllocError::OrphanedRoom(orphan.name.clone()));
        }
        let shared = self.per_person_shared_cost();
        let pay = self
            .assignments
            .iter()
            .map(|(occupant, own)| {
                let individual: Amount = own
                    .iter()
                    .map(|name| &self.rooms[name])
                    .map(|room| room.total / room.num_share as Amount)
                    .sum();
                (occupant.clone(), individual + shared)
            })
            .collect();
        Ok(pay)
    }
}

/// Owner of the current apartment snapshot.
///
/// Starts uninitialized; a successful [`RentAllocator::set_apartment`] makes
/// the pay queries available. A failed call keeps whatever was there before.
#[derive(Debug, Default)]
pub struct RentAllocator {
    apartment: Option<Apartment>,
}

impl RentAllocator {
    pub fn new() -> RentAllocator {
        RentAllocator::default()
    }

    pub fn set_apartment(
        &mut self,
        rooms: BTreeMap<RoomName, RoomSpec>,
        assignments: BTreeMap<Occupant, Vec<RoomName>>,
        apt_cost: Amount,
        num_people: usize,
    ) -> Result<(), AllocError> {
        self.load(ApartmentInput { rooms, assignments, apt_cost, num_people })
    }

    pub fn load(&mut self, input: ApartmentInput) -> Result<(), AllocError> {
        let apartment = Apartment::new(input)?;
        self.apartment = Some(apartment);
        Ok(())
    }

    pub fn apartment(&self) -> Result<&Apartment, AllocError> {
        self.apartment.as_ref().ok_or(AllocError::NotInitialized)
    }

    pub fn room_pay(&self) -> Result<BTreeMap<RoomName, Amount>, AllocError> {
        Ok(self.apartment()?.room_pay())
    }

    pub fn person_pay(&self) -> Result<BTreeMap<Occupant, Amount>, AllocError> {
        self.apartment()?.person_pay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> RoomName {
        RoomName::new(raw).unwrap()
    }

    fn input(rooms: &[(&str, f64, bool)], people: &[(&str, &str)], cost: f64) -> ApartmentInput {
        ApartmentInput {
            rooms: rooms
                .iter()
                .map(|&(room, size, sharing)| (name(room), RoomSpec { size, sharing }))
                .collect(),
            assignments: people
                .iter()
                .map(|&(person, own)| (person.to_string(), own.split(',').filter_map(RoomName::new).collect()))
                .collect(),
            apt_cost: cost,
            num_people: people.len(),
        }
    }

    fn bedroom_and_kitchen() -> ApartmentInput {
        input(
            &[("bedroom", 100.0, false), ("kitchen", 50.0, true)],
            &[("person 1", "bedroom"), ("person 2", "")],
            1500.0,
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn bedroom_and_kitchen_split() {
        let apartment = Apartment::new(bedroom_and_kitchen()).unwrap();
        let rooms = apartment.room_pay();
        assert!(close(rooms[&name("bedroom")], 1000.0));
        assert!(close(rooms[&name("kitchen")], 500.0));
        assert!(close(apartment.per_person_shared_cost(), 250.0));

        let people = apartment.person_pay().unwrap();
        assert!(close(people["person 1"], 1250.0));
        assert!(close(people["person 2"], 250.0));
    }

    #[test]
    fn claimed_room_is_split_among_claimants() {
        let apartment = Apartment::new(input(
            &[("den", 120.0, false), ("bath", 30.0, false)],
            &[("a", "den, bath"), ("b", "den"), ("c", "bath")],
            900.0,
        ))
        .unwrap();
        let den = apartment.room(&name("den")).unwrap();
        assert_eq!(den.num_share, 2);
        assert!(close(den.total, 720.0));

        let people = apartment.person_pay().unwrap();
        assert!(close(people["a"], 360.0 + 90.0));
        assert!(close(people["b"], 360.0));
        assert!(close(people["c"], 90.0));
    }

    #[test]
    fn sharing_rooms_are_dropped_from_claims() {
        // Consecutive sharing rooms in one list must all be dropped.
        let apartment = Apartment::new(input(
            &[("kitchen", 40.0, true), ("bath", 20.0, true), ("bedroom", 60.0, false)],
            &[("a", "kitchen, bath, bedroom"), ("b", "bath, kitchen")],
            1200.0,
        ))
        .unwrap();
        assert!(apartment.assignments()["a"].iter().eq([&name("bedroom")]));
        assert!(apartment.assignments()["b"].is_empty());
        assert_eq!(apartment.room(&name("kitchen")).unwrap().num_share, 0);

        let people = apartment.person_pay().unwrap();
        assert!(close(people["a"], 600.0 + 300.0));
        assert!(close(people["b"], 300.0));
    }

    #[test]
    fn repeated_claim_counts_once() {
        let apartment = Apartment::new(input(
            &[("office", 10.0, false)],
            &[("a", "office, Office"), ("b", "office")],
            100.0,
        ))
        .unwrap();
        assert_eq!(apartment.room(&name("office")).unwrap().num_share, 2);
        let people = apartment.person_pay().unwrap();
        assert!(close(people["a"], 50.0));
    }

    #[test]
    fn unknown_room_is_reported() {
        let err = Apartment::new(input(
            &[("bedroom", 100.0, false)],
            &[("a", "bedroom, attic")],
            1000.0,
        ))
        .unwrap_err();
        assert_eq!(err, AllocError::UnknownRoom { occupant: "a".to_string(), room: name("attic") });
    }

    #[test]
    fn non_positive_values_are_invalid() {
        let zero_size = input(&[("bedroom", 0.0, false)], &[("a", "bedroom")], 1000.0);
        let negative_cost = input(&[("bedroom", 10.0, false)], &[("a", "bedroom")], -5.0);
        let nan_size = input(&[("bedroom", f64::NAN, false)], &[("a", "bedroom")], 1000.0);
        let no_rooms = input(&[], &[("a", "")], 1000.0);
        let no_people = input(&[("bedroom", 10.0, true)], &[], 1000.0);
        for bad in [zero_size, negative_cost, nan_size, no_rooms, no_people] {
            assert!(matches!(Apartment::new(bad), Err(AllocError::InvalidApartment(_))));
        }
    }

    #[test]
    fn people_count_must_match_assignments() {
        let mut bad = bedroom_and_kitchen();
        bad.num_people = 3;
        assert!(matches!(Apartment::new(bad), Err(AllocError::InvalidApartment(_))));
    }

    #[test]
    fn orphaned_room_fails_person_pay_only() {
        let apartment = Apartment::new(input(
            &[("bedroom", 100.0, false), ("study", 50.0, false)],
            &[("a", "bedroom")],
            1500.0,
        ))
        .unwrap();
        assert_eq!(apartment.room_pay().len(), 2);
        assert_eq!(apartment.person_pay(), Err(AllocError::OrphanedRoom(name("study"))));
    }

    #[test]
    fn allocator_requires_setup() {
        let allocator = RentAllocator::new();
        assert_eq!(allocator.room_pay(), Err(AllocError::NotInitialized));
        assert_eq!(allocator.person_pay(), Err(AllocError::NotInitialized));
    }

    #[test]
    fn failed_setup_keeps_previous_apartment() {
        let mut allocator = RentAllocator::new();
        allocator.load(bedroom_and_kitchen()).unwrap();
        let before = allocator.room_pay().unwrap();

        let mut bad = bedroom_and_kitchen();
        bad.assignments.insert("person 2".to_string(), vec![name("garage")]);
        assert!(matches!(allocator.load(bad), Err(AllocError::UnknownRoom { .. })));
        assert_eq!(allocator.room_pay().unwrap(), before);
    }

    #[test]
    fn failed_first_setup_stays_uninitialized() {
        let mut allocator = RentAllocator::new();
        let mut bad = bedroom_and_kitchen();
        bad.apt_cost = 0.0;
        assert!(allocator.load(bad).is_err());
        assert_eq!(allocator.room_pay(), Err(AllocError::NotInitialized));
    }
}
