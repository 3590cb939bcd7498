//! Inlet/outlet zone configuration for DualSPHysics cases.
//!
//! The crate holds the inlet/outlet configuration tree edited by the case
//! designer GUI, renders it into the `<inout>` section consumed by GenCase,
//! and loads/saves case documents with versioned schema migration.

pub mod api;
pub mod case;
pub mod error;
pub mod models;
pub mod render;
pub mod settings;
