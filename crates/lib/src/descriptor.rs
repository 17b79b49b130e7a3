//! Access to the fields of a build descriptor.
//!
//! The descriptor is the rockspec-shaped Lua table passed through the whole
//! build. Hooks receive the same table handle and mutate it in place.

use mlua::prelude::*;

use crate::lua::values::type_name;

/// The `build` sub-table, or `None` when the descriptor has none.
pub fn build_table(descriptor: &LuaTable) -> LuaResult<Option<LuaTable>> {
  match descriptor.get::<LuaValue>("build")? {
    LuaValue::Nil => Ok(None),
    LuaValue::Table(build) => Ok(Some(build)),
    other => Err(LuaError::external(format!("build must be a table, got {}", type_name(&other)))),
  }
}

/// The variable store, created empty if the descriptor has none yet.
pub fn variables(lua: &Lua, descriptor: &LuaTable) -> LuaResult<LuaTable> {
  match descriptor.get::<LuaValue>("variables")? {
    LuaValue::Table(variables) => Ok(variables),
    LuaValue::Nil => {
      let variables = lua.create_table()?;
      descriptor.set("variables", variables.clone())?;
      Ok(variables)
    }
    other => Err(LuaError::external(format!(
      "variables must be a table, got {}",
      type_name(&other)
    ))),
  }
}

/// Names of the declared external dependencies.
///
/// `external_dependencies` maps each dependency name to its details; only the
/// names matter here. Names are sorted, since table iteration order is not
/// stable across runs.
pub fn external_dependencies(descriptor: &LuaTable) -> LuaResult<Vec<String>> {
  let deps = match descriptor.get::<LuaValue>("external_dependencies")? {
    LuaValue::Nil => return Ok(Vec::new()),
    LuaValue::Table(deps) => deps,
    other => {
      return Err(LuaError::external(format!(
        "external_dependencies must be a table, got {}",
        type_name(&other)
      )));
    }
  };

  let mut names = Vec::new();
  for pair in deps.pairs::<LuaValue, LuaValue>() {
    if let (LuaValue::String(name), _) = pair? {
      names.push(name.to_str()?.to_string());
    }
  }
  names.sort();
  Ok(names)
}
