//! Compiling hook code into callable Lua functions.

use std::fs;
use std::path::Path;

use mlua::prelude::*;

/// Compile a hook script into a function bound to `env`.
///
/// The chunk is not executed. When called, it receives the build descriptor
/// followed by the hook's string arguments as `...`. The chunk is named after
/// its path so runtime errors and tracebacks point at the script.
pub fn load_hook_script(lua: &Lua, path: &Path, env: LuaTable) -> LuaResult<LuaFunction> {
  let content = fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;

  lua
    .load(&content)
    .set_name(format!("@{}", path.display()))
    .set_environment(env)
    .into_function()
}

/// Evaluate the source of a Lua-backed builtin hook and return what it produced.
///
/// A well-formed builtin chunk returns the hook function; callers check that.
pub fn load_builtin_chunk(lua: &Lua, name: &str, source: &str, env: LuaTable) -> LuaResult<LuaValue> {
  lua
    .load(source)
    .set_name(format!("=builtin-hook:{}", name))
    .set_environment(env)
    .eval::<LuaValue>()
}
