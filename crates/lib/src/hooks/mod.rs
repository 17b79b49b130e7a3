//! Build hooks: code run immediately before and after the standard build.
//!
//! A rockspec configures hooks under `build.before_build` and
//! `build.after_build`, each either a single reference or an array:
//!
//! ```lua
//! build = {
//!   before_build = { "$(pkgconfig)", "$(extra-vars)" },
//!   after_build = "hooks/post.lua --strip",
//! }
//! ```
//!
//! # Submodules
//!
//! - [`parse`] - Reference grammar and target resolution
//! - [`registry`] - Builtin hooks addressed as `$(name)`
//! - [`sequencer`] - Validate-then-run sequencing around the standard build
//! - [`types`] - Descriptors and errors

pub mod parse;
pub mod registry;
pub mod sequencer;
pub mod types;

pub use parse::{Target, parse_hooks, parse_reference, parse_target};
pub use registry::{BuiltinHook, BuiltinRegistry, EXTRA_VARS_HOOK, PKGCONFIG_HOOK};
pub use sequencer::{AFTER_BUILD, BEFORE_BUILD, LuaBuild, StandardBuild, run_build, run_hooks};
pub use types::{HookCallable, HookDescriptor, HookError, HookKind, ResolveError};
