//! Command implementations for the `favd` CLI.
//!
//! - `render` - ingest a snapshot and print the grid
//! - `store` - operate on the favorites store file
//! - `config` - configuration file management

pub(crate) mod config;
pub(crate) mod render;
pub(crate) mod store;

pub(crate) use config::*;
pub(crate) use render::*;
pub(crate) use store::*;
