//! Running before-hooks, the standard build, and after-hooks in order.
//!
//! Both hook fields are parsed and resolved before anything runs, so a
//! malformed `after_build` stops the build before any `before_build` hook has
//! touched the descriptor. Execution stops at the first failure.

use std::path::Path;

use mlua::prelude::*;
use tracing::info;

use crate::hooks::parse::parse_hooks;
use crate::hooks::registry::BuiltinRegistry;
use crate::hooks::types::{HookDescriptor, HookError};
use crate::workdir::WorkingDir;

/// Hook field run before the standard build.
pub const BEFORE_BUILD: &str = "before_build";

/// Hook field run after a successful standard build.
pub const AFTER_BUILD: &str = "after_build";

/// The build step the hooks wrap.
pub trait StandardBuild {
  fn run(&self, lua: &Lua, descriptor: &LuaTable) -> LuaResult<()>;
}

impl<F> StandardBuild for F
where
  F: Fn(&Lua, &LuaTable) -> LuaResult<()>,
{
  fn run(&self, lua: &Lua, descriptor: &LuaTable) -> LuaResult<()> {
    self(lua, descriptor)
  }
}

/// A standard build implemented by a Lua build backend, called as `build(descriptor)`.
#[derive(Debug, Clone)]
pub struct LuaBuild(pub LuaFunction);

impl StandardBuild for LuaBuild {
  fn run(&self, _lua: &Lua, descriptor: &LuaTable) -> LuaResult<()> {
    self.0.call::<()>(descriptor.clone())
  }
}

/// Run the hook pipeline with `build_dir` as the working directory.
///
/// The previous working directory is restored afterwards. If restoring fails,
/// that error is returned even when the pipeline itself also failed.
pub fn run_build(
  lua: &Lua,
  descriptor: &LuaTable,
  registry: &BuiltinRegistry,
  standard_build: &dyn StandardBuild,
  build_dir: &Path,
) -> Result<(), HookError> {
  let dir = WorkingDir::push(build_dir)?;
  let result = run_hooks(lua, descriptor, registry, standard_build);
  dir.pop()?;
  result
}

/// Run the hook pipeline in the current working directory.
pub fn run_hooks(
  lua: &Lua,
  descriptor: &LuaTable,
  registry: &BuiltinRegistry,
  standard_build: &dyn StandardBuild,
) -> Result<(), HookError> {
  let before = parse_hooks(lua, descriptor, BEFORE_BUILD, registry)?;
  let after = parse_hooks(lua, descriptor, AFTER_BUILD, registry)?;

  run_phase(lua, descriptor, &before)?;
  standard_build.run(lua, descriptor).map_err(HookError::Build)?;
  run_phase(lua, descriptor, &after)
}

fn run_phase(lua: &Lua, descriptor: &LuaTable, hooks: &[HookDescriptor]) -> Result<(), HookError> {
  for hook in hooks {
    info!(hook = %hook.display_name, kind = %hook.kind, "{}", hook.original_value);
    hook.invoke(lua, descriptor)?;
  }
  Ok(())
}
