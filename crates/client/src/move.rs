//! Defines the representation of a move on the client side.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::Position;

/// A piece travelling from one intersection to another.
///
/// The server reports applied moves as `{"from": [r, c], "to": [r, c]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
