//! # blockvol-common
//!
//! Shared error definitions, configuration model, domain types, and
//! constants used across the blockvol workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and holds nothing that touches host state.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
