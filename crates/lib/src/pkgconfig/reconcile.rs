//! Merging package metadata into the variable store.

use std::collections::BTreeMap;

use mlua::prelude::*;
use tracing::{info, warn};

use crate::descriptor;
use crate::lua::values::describe;
use crate::pkgconfig::tool::PkgConfig;

/// Variable suffix for a metadata field.
pub fn field_suffix(field: &str) -> String {
  match field {
    "includedir" => "INCDIR".to_string(),
    "libdir" => "LIBDIR".to_string(),
    "prefix" => "DIR".to_string(),
    "bindir" => "BINDIR".to_string(),
    other => other.to_uppercase(),
  }
}

/// Refresh the `<PACKAGE>_*` variables of every external dependency.
///
/// After a dependency is reconciled, its prefixed variables are exactly the
/// freshly queried set: new values are added, changed ones updated, and stale
/// ones dropped, each change logged.
///
/// Processing stops at the first dependency the package tool does not know,
/// or whose metadata cannot be queried. Neither case is an error; after a
/// failed query the dependency's prefixed variables stay removed.
pub fn reconcile(lua: &Lua, tool: &PkgConfig, descriptor: &LuaTable) -> LuaResult<()> {
  let variables = descriptor::variables(lua, descriptor)?;

  for dependency in descriptor::external_dependencies(descriptor)? {
    let lookup = tool.find_package(&dependency);
    let Some(package) = lookup.name else {
      warn!(dependency = %dependency, "{} is not registered in {}", dependency, tool.program());
      if !lookup.suggestions.is_empty() {
        warn!(dependency = %dependency, "did you mean: {}", lookup.suggestions.join(", "));
      }
      // TODO: carry on with the remaining dependencies instead of stopping here.
      return Ok(());
    };

    let prefix = format!("{}_", package.to_uppercase());
    let mut old_vars = take_prefixed(&variables, &prefix)?;

    let fields = match tool.metadata(&package) {
      Ok(fields) => fields,
      Err(err) => {
        warn!(package = %package, error = %err, "failed to query package metadata");
        return Ok(());
      }
    };

    for (field, value) in fields {
      let key = format!("{}{}", prefix, field_suffix(&field));
      match old_vars.remove(&key) {
        None => info!(package = %package, "added {} = {}", key, value),
        Some(LuaValue::String(old)) if old == value.as_str() => info!(package = %package, "kept {} = {}", key, value),
        Some(old) => info!(package = %package, "updated {} = {} (was {})", key, value, describe(&old)),
      }
      variables.set(key, value)?;
    }

    for (key, old) in old_vars {
      info!(package = %package, "removed {} (was {})", key, describe(&old));
    }
  }

  Ok(())
}

/// Remove and return every variable whose name starts with `prefix`.
fn take_prefixed(variables: &LuaTable, prefix: &str) -> LuaResult<BTreeMap<String, LuaValue>> {
  let mut taken = BTreeMap::new();
  for pair in variables.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    if let LuaValue::String(key) = key {
      let key = key.to_str()?.to_string();
      if key.starts_with(prefix) {
        taken.insert(key, value);
      }
    }
  }

  for key in taken.keys() {
    variables.set(key.as_str(), LuaValue::Nil)?;
  }

  Ok(taken)
}
