//! Isolated environments for hook scripts.
//!
//! Every script hook gets its own environment table built from a deep copy of
//! the host globals. Library tables (`string`, `table`, `os`, ...) are copied,
//! so a script that replaces `string.format` or adds fields to `table` only
//! changes its own copy. Functions are shared by reference.
//!
//! Inside the copy, `_G` refers to the copy itself and `print` is routed to the
//! build log. `require` answers from the copy's `package.loaded` first, so
//! `require("string")` returns the copied library rather than the host's.

use std::collections::HashMap;
use std::ffi::c_void;

use mlua::prelude::*;
use tracing::info;

/// Build a fresh execution context for one hook invocation.
pub fn create_context(lua: &Lua) -> LuaResult<LuaTable> {
  let mut copies = HashMap::new();
  let env = copy_table(lua, &lua.globals(), &mut copies)?;
  env.raw_set("print", create_print(lua)?)?;
  install_require(lua, &env)?;
  Ok(env)
}

/// Replace `require` in `env` with one that consults the copied `package.loaded`
/// before falling back to the host loader.
fn install_require(lua: &Lua, env: &LuaTable) -> LuaResult<()> {
  let Some(host_require) = lua.globals().get::<Option<LuaFunction>>("require")? else {
    return Ok(());
  };
  let Some(package) = env.raw_get::<Option<LuaTable>>("package")? else {
    return Ok(());
  };
  let Some(loaded) = package.raw_get::<Option<LuaTable>>("loaded")? else {
    return Ok(());
  };

  // Must stay a Lua closure: a Rust closure capturing `loaded` is never collected.
  let require: LuaFunction = lua
    .load(
      r#"
      local loaded, host_require = ...
      return function(name)
        local module = loaded[name]
        if module ~= nil then
          return module
        end
        return host_require(name)
      end
      "#,
    )
    .set_name("=sandbox-require")
    .call((loaded, host_require))?;
  env.raw_set("require", require)
}

/// Deep-copy `source`, reusing the copy of any table already visited.
///
/// `copies` is keyed by source table identity, which keeps self-referential
/// graphs (`_G._G`, `package.loaded`) finite and preserves their shape.
fn copy_table(lua: &Lua, source: &LuaTable, copies: &mut HashMap<*const c_void, LuaTable>) -> LuaResult<LuaTable> {
  if let Some(copy) = copies.get(&source.to_pointer()) {
    return Ok(copy.clone());
  }

  let copy = lua.create_table()?;
  copies.insert(source.to_pointer(), copy.clone());

  for pair in source.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let value = match value {
      LuaValue::Table(nested) => LuaValue::Table(copy_table(lua, &nested, copies)?),
      other => other,
    };
    copy.raw_set(key, value)?;
  }

  Ok(copy)
}

/// `print` replacement that writes tab-separated arguments to the log.
fn create_print(lua: &Lua) -> LuaResult<LuaFunction> {
  lua.create_function(|lua, args: LuaMultiValue| {
    let tostring: LuaFunction = lua.globals().get("tostring")?;
    let mut parts = Vec::with_capacity(args.len());
    for value in args {
      parts.push(tostring.call::<String>(value)?);
    }
    info!("{}", parts.join("\t"));
    Ok(())
  })
}
