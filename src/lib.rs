//! Splits an apartment's rent among its rooms by square footage and among
//! its occupants by the rooms each one uses.

pub mod allocate;
pub mod config;
pub mod model;
pub mod parse;
pub mod prompt;

pub use allocate::{AllocError, Apartment, RentAllocator};
pub use model::apartment::ApartmentInput;
pub use model::entity::{Amount, Occupant, Room, RoomName, RoomSpec};
