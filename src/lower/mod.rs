//! Per-operator lowering rules.
//!
//! Each module lowers one family of algebra operators to a tile,
//! following a shared discipline: convert the input tile(s) with
//! [`crate::tile::to_open`] (or [`crate::tile::to_plain`] for set-op
//! arms), translate expressions against the input's select-list so
//! column values are captured eagerly, then either extend the open body
//! in place or wrap the result as a closed tile.

pub mod aggregate;
pub mod anti_join;
pub mod distinct;
pub mod filter;
pub mod join;
pub mod nullary;
pub mod project;
pub mod semi_join;
pub mod serialize;
pub mod set_op;
pub mod window;

#[cfg(test)]
pub(crate) mod test_helpers;
