//! CLI subcommand implementations

pub mod catalog;
pub mod predict;
pub mod settings;
pub mod training;
