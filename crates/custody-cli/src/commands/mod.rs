//! Subcommand implementations.

pub mod canonicalize;
pub mod export;
pub mod inspect;
pub mod verify;
