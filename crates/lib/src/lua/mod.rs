//! Lua helpers for running hooks.
//!
//! Hook scripts and the build descriptor both live in an `mlua` state owned by
//! the caller. This module provides the pieces the hook engine needs on top of
//! that state:
//!
//! - [`loaders`] - Compiling hook scripts and builtin chunks into functions
//! - [`sandbox`] - Building the isolated environment each script runs in
//! - [`values`] - Reading array-like tables and rendering table keys

pub mod loaders;
pub mod sandbox;
pub mod values;
