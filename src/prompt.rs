use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::model::apartment::ApartmentInput;
use crate::model::entity::{RoomName, RoomSpec};
use crate::parse::{self, ParseError};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input ended before the apartment was complete")]
    Eof,
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented question/answer loop over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Prompter<R, W> {
        Prompter { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Asks `label` until `parse` accepts the answer, printing each rejection.
    pub fn ask<T, E, F>(&mut self, label: &str, parse: F) -> Result<T, PromptError>
    where
        E: Display,
        F: Fn(&str) -> Result<T, E>,
    {
        loop {
            write!(self.output, "{label}")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PromptError::Eof);
            }
            match parse(line.trim_end_matches(['\r', '\n'])) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(label, answer = line.trim(), "rejected answer");
                    writeln!(self.output, "{err}")?;
                }
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Walks the user through rooms and occupants and returns the apartment.
pub fn collect_apartment<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<ApartmentInput, PromptError> {
    let num_rooms: usize = prompter.ask("Number of rooms: ", parse::parse_positive)?;
    let num_people: usize = prompter.ask("Number of people: ", parse::parse_positive)?;
    let apt_cost: f64 = prompter.ask("Cost of the Apartment: ", parse::parse_positive)?;

    let mut rooms: BTreeMap<RoomName, RoomSpec> = BTreeMap::new();
    for i in 1..=num_rooms {
        prompter.say(format!("{0} Room {i} {0}", "-".repeat(10)))?;
        let name = prompter.ask(&format!("Name of Room {i}: "), |answer| {
            let name = parse::parse_room_name(answer)?;
            if rooms.contains_key(&name) {
                Err(ParseError::DuplicateRoom(name))
            } else {
                Ok(name)
            }
        })?;
        let size = prompter.ask(&format!("{name} Square Footage: "), parse::parse_positive::<f64>)?;
        let sharing = prompter.ask("Everyone shares this room: ", parse::parse_flag)?;
        rooms.insert(name, RoomSpec { size, sharing });
    }

    prompter.say(format!("{0} Rooms People Pay for {0}", "-".repeat(10)))?;
    prompter.say("List the rooms each person will pay for separated by a \",\".")?;
    let mut assignments = BTreeMap::new();
    for i in 1..=num_people {
        let own = prompter.ask(&format!("Person {i}: "), |answer| parse::parse_room_list(answer, &rooms))?;
        assignments.insert(format!("person {i}"), own);
    }

    Ok(ApartmentInput { rooms, assignments, apt_cost, num_people })
}
