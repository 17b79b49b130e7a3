//! Package metadata discovery through the system package tool.
//!
//! For every external dependency, the `$(pkgconfig)` builtin resolves the
//! package name, queries its metadata, and replaces the `<NAME>_*` variables
//! in the build's variable store with the fresh values.
//!
//! # Submodules
//!
//! - [`tool`] - Running the package tool and resolving package names
//! - [`reconcile`] - Merging package metadata into the variable store
//! - [`hook`] - The builtin hook wrapper

pub mod hook;
pub mod reconcile;
pub mod tool;
pub mod types;

pub use hook::PkgConfigHook;
pub use reconcile::{field_suffix, reconcile};
pub use tool::{PackageLookup, PkgConfig, ProcessRunner, SystemRunner};
pub use types::PkgConfigError;
