//! Actions and the positional command syntax
//!
//! [`Action`] is what the resolver accepts: it names characters by handle.
//! [`Command`] is the positional form a human or a script writes, with hand
//! cards counted from the most recent draw and characters given as signed
//! board indices (`0` own hero, `1..N` own minions, `-0` enemy hero,
//! `-1..-N` enemy minions). A [`crate::game::Snapshot`] turns a command into
//! an action against the current board.

use crate::core::CharacterHandle;
use crate::zones::HandIndex;
use crate::{EngineError, Result};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step a player takes on their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    PlayMinion { card: HandIndex, position: usize },
    PlaySpell { card: HandIndex },
    Attack { attacker: CharacterHandle, defender: CharacterHandle },
    UseHeroPower,
    EndTurn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlayMinion { card, position } => write!(f, "play card {card} at {position}"),
            Action::PlaySpell { card } => write!(f, "cast card {card}"),
            Action::Attack { attacker, defender } => write!(f, "attack {defender} with {attacker}"),
            Action::UseHeroPower => write!(f, "use hero power"),
            Action::EndTurn => write!(f, "end turn"),
        }
    }
}

/// Board side relative to the player issuing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Friendly,
    Enemy,
}

/// Signed positional character reference
///
/// Index 0 is the hero and 1..N the minions in board order. The side is
/// stored explicitly because `-0` (enemy hero) and `0` (own hero) are the
/// same integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    pub side: Side,
    pub index: usize,
}

impl CharacterRef {
    pub fn friendly(index: usize) -> Self {
        CharacterRef { side: Side::Friendly, index }
    }

    pub fn enemy(index: usize) -> Self {
        CharacterRef { side: Side::Enemy, index }
    }

    pub fn is_hero(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for CharacterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Side::Friendly => write!(f, "{}", self.index),
            Side::Enemy => write!(f, "-{}", self.index),
        }
    }
}

impl FromStr for CharacterRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        run_parser(character_ref, s)
    }
}

/// Positional action, as typed or scripted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    PlayMinion { card: HandIndex, position: usize },
    PlaySpell { card: HandIndex },
    Attack { attacker: CharacterRef, defender: CharacterRef },
    UseHeroPower,
    EndTurn,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PlayMinion { card, position } => write!(f, "play {card} {position}"),
            Command::PlaySpell { card } => write!(f, "spell {card}"),
            Command::Attack { attacker, defender } => write!(f, "attack {attacker} {defender}"),
            Command::UseHeroPower => write!(f, "power"),
            Command::EndTurn => write!(f, "end"),
        }
    }
}

impl FromStr for Command {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        run_parser(command, s)
    }
}

/// Parse a script of commands separated by `;` or newlines.
///
/// Blank segments and `#` comments are skipped.
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .split([';', '\n'])
        .map(|segment| segment.split('#').next().unwrap_or("").trim())
        .filter(|segment| !segment.is_empty())
        .map(Command::from_str)
        .collect()
}

fn run_parser<'a, T>(parser: impl FnMut(&'a str) -> IResult<&'a str, T>, input: &'a str) -> Result<T> {
    all_consuming(delimited(multispace0, parser, multispace0))(input)
        .map(|(_, value)| value)
        .map_err(|e| EngineError::ParseError(format!("cannot parse {input:?}: {e}")))
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn character_ref(input: &str) -> IResult<&str, CharacterRef> {
    map(tuple((opt(char('-')), number)), |(minus, index)| CharacterRef {
        side: if minus.is_some() { Side::Enemy } else { Side::Friendly },
        index,
    })(input)
}

fn keyword<'a>(long: &'static str, short: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    alt((tag_no_case(long), tag_no_case(short)))
}

fn play(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("play", "p"),
            preceded(multispace1, number),
            preceded(multispace1, number),
        )),
        |(_, card, position)| Command::PlayMinion { card: HandIndex(card), position },
    )(input)
}

fn spell(input: &str) -> IResult<&str, Command> {
    map(
        tuple((keyword("spell", "s"), preceded(multispace1, number))),
        |(_, card)| Command::PlaySpell { card: HandIndex(card) },
    )(input)
}

fn attack(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("attack", "a"),
            preceded(multispace1, character_ref),
            preceded(multispace1, character_ref),
        )),
        |(_, attacker, defender)| Command::Attack { attacker, defender },
    )(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        play,
        spell,
        attack,
        value(Command::UseHeroPower, keyword("power", "hp")),
        value(Command::EndTurn, keyword("end", "e")),
    ))(input)
}
