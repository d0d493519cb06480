//! Text parsing for the data-entry front ends.
//!
//! Every parser returns a [`ParseError`] whose message is fit to show the user
//! before asking again.

use std::collections::BTreeMap;
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

use crate::model::entity::RoomName;

const TRUE_WORDS: [&str; 5] = ["yes", "true", "y", "t", "1"];
const FALSE_WORDS: [&str; 5] = ["no", "false", "n", "f", "0"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Input must be: yes, no, true, false, y, n, t, f, 1, or 0")]
    NotAFlag,
    #[error("Input must be a number")]
    NotANumber,
    #[error("Input must be > 0")]
    NotPositive,
    #[error("Room name must not be blank")]
    BlankName,
    #[error("Room '{0}' was already entered")]
    DuplicateRoom(RoomName),
    #[error("One or more of the rooms are invalid! ({0})")]
    UnknownRooms(String),
}

pub fn parse_flag(input: &str) -> Result<bool, ParseError> {
    let word = input.trim().to_lowercase();
    if TRUE_WORDS.contains(&word.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&word.as_str()) {
        Ok(false)
    } else {
        Err(ParseError::NotAFlag)
    }
}

/// Parses a number that must be strictly greater than zero.
pub fn parse_positive<T>(input: &str) -> Result<T, ParseError>
where
    T: FromStr + PartialOrd + Default,
{
    let value: T = input.trim().parse().map_err(|_| ParseError::NotANumber)?;
    // NaN fails this comparison too.
    if value > T::default() {
        Ok(value)
    } else {
        Err(ParseError::NotPositive)
    }
}

pub fn parse_room_name(input: &str) -> Result<RoomName, ParseError> {
    RoomName::new(input).ok_or(ParseError::BlankName)
}

/// Splits a comma-separated list of room names, checking each against `known`.
///
/// An empty line means no rooms.
pub fn parse_room_list<V>(input: &str, known: &BTreeMap<RoomName, V>) -> Result<Vec<RoomName>, ParseError> {
    let (rooms, unknown): (Vec<RoomName>, Vec<RoomName>) = input
        .split(',')
        .filter_map(RoomName::new)
        .partition(|room| known.contains_key(room));
    if !unknown.is_empty() {
        return Err(ParseError::UnknownRooms(unknown.iter().join(", ")));
    }
    Ok(rooms)
}
