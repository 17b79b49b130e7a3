//! rockhooks-lib: build hooks for rockspec-driven builds
//!
//! This crate runs user-defined hooks around a standard build step:
//! - `hooks`: parsing hook references, resolving them to builtins or Lua
//!   scripts, and running them before and after the build
//! - `pkgconfig`: the `$(pkgconfig)` builtin, which reconciles package
//!   metadata into the build's variables
//! - `vars`: the `$(extra-vars)` builtin, which appends to existing variables
//! - `workdir`: scoped working directory changes around a build

pub mod config;
pub mod descriptor;
pub mod hooks;
pub mod lua;
pub mod pkgconfig;
pub mod util;
pub mod vars;
pub mod workdir;

pub use config::Config;
pub use hooks::{BuiltinRegistry, HookError, StandardBuild, run_build, run_hooks};
