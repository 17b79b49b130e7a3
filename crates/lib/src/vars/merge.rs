//! Value normalization and append logic.

use std::env;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::lua::values::{ArrayError, describe, index_path, string_array};
use crate::vars::types::{ValueError, VarsError};

/// Flatten a variable value into a single space-separated string.
///
/// Strings are trimmed. Arrays have each element trimmed, blank elements
/// dropped, and the rest joined with single spaces.
pub fn normalize(value: &LuaValue) -> Result<String, ValueError> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.trim().to_string()),
    LuaValue::Table(list) => {
      let items = string_array(list).map_err(|err| match err {
        ArrayError::NotString(position) => ValueError::InvalidElement(position),
        ArrayError::Lua(e) => ValueError::Lua(e),
      })?;
      let parts: Vec<&str> = items.iter().map(|item| item.trim()).filter(|item| !item.is_empty()).collect();
      Ok(parts.join(" "))
    }
    _ => Err(ValueError::InvalidType),
  }
}

/// Append every `name = value` entry onto the matching variable.
///
/// Only variables that already hold a non-empty string are extended; other
/// entries are skipped and logged. `source` is the field path used in logs
/// and error messages, e.g. `build.extra_variables`.
pub fn append(variables: &LuaTable, entries: &LuaTable, source: &str) -> Result<(), VarsError> {
  for pair in entries.pairs::<LuaValue, LuaValue>() {
    let (name, value) = pair?;
    let path = index_path(source, &name);

    let LuaValue::String(name) = name else {
      return Err(VarsError::InvalidName { path });
    };
    let name = name.to_str()?.to_string();
    let addition = normalize(&value).map_err(|source| VarsError::InvalidValue {
      path: path.clone(),
      source,
    })?;

    let current = match variables.get::<LuaValue>(name.as_str())? {
      LuaValue::String(current) => current.to_str()?.trim().to_string(),
      LuaValue::Nil => {
        info!(%source, "skip {}: variable is not defined", name);
        continue;
      }
      other => {
        info!(%source, "skip {}: variable holds {}, not a string", name, describe(&other));
        continue;
      }
    };
    if current.is_empty() {
      info!(%source, "skip {}: variable is empty", name);
      continue;
    }
    if addition.is_empty() {
      info!(%source, "skip {}: nothing to append", name);
      continue;
    }

    let merged = format!("{} {}", current, addition);
    info!(%source, "{} = {}", name, merged);
    variables.set(name, merged)?;
  }

  Ok(())
}

/// Whether the environment flag `name` is switched on (`1` or `true`).
pub fn flag_enabled(name: &str) -> bool {
  matches!(env::var(name).as_deref(), Ok("1" | "true"))
}

/// Append the entries of every enabled flag in `flags`.
///
/// Each flag's entries must be a table whether or not the flag is enabled.
pub fn append_conditional(variables: &LuaTable, flags: &LuaTable, source: &str) -> Result<(), VarsError> {
  for pair in flags.pairs::<LuaValue, LuaValue>() {
    let (flag, entries) = pair?;
    let path = index_path(source, &flag);

    let LuaValue::String(flag) = flag else {
      return Err(VarsError::InvalidFlag { path });
    };
    let LuaValue::Table(entries) = entries else {
      return Err(VarsError::NotATable { path });
    };

    let flag = flag.to_str()?.to_string();
    if flag_enabled(&flag) {
      append(variables, &entries, &path)?;
    } else {
      debug!("{} is not enabled, skipping {}", flag, path);
    }
  }

  Ok(())
}
