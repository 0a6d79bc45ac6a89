//! Client side of a Xiangqi game played against a remote server.
//!
//! The server owns the rules, move legality and the AI. This crate keeps the
//! local view of a game in sync with it, turns clicks into validated moves
//! and draws the board onto any [`render::Surface`].

pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod r#move;
pub mod position;
pub mod protocol;
pub mod render;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod status;

#[cfg(test)]
mod test_support;
