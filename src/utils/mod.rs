//! Shared helpers for paths, flag parsing and terminal output

pub mod flags;
pub mod paths;
pub mod terminal;
