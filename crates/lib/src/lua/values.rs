//! Reading Lua values the hook configuration is made of.

use mlua::prelude::*;

/// Why a table could not be read as an array of strings.
#[derive(Debug)]
pub enum ArrayError {
  /// The entry at this position (or key, for entries outside the sequence) is not a string.
  NotString(String),
  Lua(LuaError),
}

impl From<LuaError> for ArrayError {
  fn from(err: LuaError) -> Self {
    ArrayError::Lua(err)
  }
}

/// Read a table as an ordered array of strings.
///
/// Every key must be an integer position within `1..=#table` and every value a
/// string. Hash-like or sparse tables are rejected, reporting the first
/// offending position or key.
pub fn string_array(table: &LuaTable) -> Result<Vec<String>, ArrayError> {
  let len = table.raw_len();

  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let in_sequence = matches!(key, LuaValue::Integer(i) if i >= 1 && usize::try_from(i).is_ok_and(|i| i <= len));
    if !in_sequence || !matches!(value, LuaValue::String(_)) {
      return Err(ArrayError::NotString(display_key(&key)));
    }
  }

  let mut items = Vec::with_capacity(len);
  for position in 1..=len {
    match table.raw_get::<LuaValue>(position)? {
      LuaValue::String(s) => items.push(s.to_str()?.to_string()),
      _ => return Err(ArrayError::NotString(position.to_string())),
    }
  }

  Ok(items)
}

/// The name Lua's `type()` gives a value.
///
/// mlua distinguishes integers from floats and light userdata from full
/// userdata; Lua reports both pairs under one name.
pub fn type_name(value: &LuaValue) -> &'static str {
  match value {
    LuaValue::Integer(_) | LuaValue::Number(_) => "number",
    LuaValue::LightUserData(_) => "userdata",
    other => other.type_name(),
  }
}

/// Render a table key the way it would be written after `#` in a message.
pub fn display_key(key: &LuaValue) -> String {
  match key {
    LuaValue::Integer(i) => i.to_string(),
    LuaValue::Number(n) => n.to_string(),
    LuaValue::String(s) => s.to_string_lossy().into(),
    other => type_name(other).to_string(),
  }
}

/// Render a table key as a bracketed index, quoting strings: `["CFLAGS"]`, `[2]`.
pub fn index_path(parent: &str, key: &LuaValue) -> String {
  match key {
    LuaValue::String(s) => format!("{}[\"{}\"]", parent, s.to_string_lossy()),
    other => format!("{}[{}]", parent, display_key(other)),
  }
}

/// Short human-readable form of a value for log lines.
pub fn describe(value: &LuaValue) -> String {
  match value {
    LuaValue::String(s) => s.to_string_lossy().into(),
    LuaValue::Integer(i) => i.to_string(),
    LuaValue::Number(n) => n.to_string(),
    LuaValue::Boolean(b) => b.to_string(),
    other => format!("<{}>", type_name(other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(lua: &Lua, code: &str) -> LuaResult<LuaTable> {
    lua.load(code).eval()
  }

  #[test]
  fn reads_sequence_in_order() -> LuaResult<()> {
    let lua = Lua::new();
    let t = table(&lua, r#"return { "a", "b", "c" }"#)?;
    let items = string_array(&t).map_err(|_| LuaError::external("not an array"))?;
    assert_eq!(items, vec!["a", "b", "c"]);
    Ok(())
  }

  #[test]
  fn empty_table_is_empty_array() -> LuaResult<()> {
    let lua = Lua::new();
    let t = lua.create_table()?;
    assert!(matches!(string_array(&t), Ok(items) if items.is_empty()));
    Ok(())
  }

  #[test]
  fn rejects_non_string_element() -> LuaResult<()> {
    let lua = Lua::new();
    let t = table(&lua, r#"return { "a", 2, "c" }"#)?;
    assert!(matches!(string_array(&t), Err(ArrayError::NotString(pos)) if pos == "2"));
    Ok(())
  }

  #[test]
  fn rejects_hash_keys() -> LuaResult<()> {
    let lua = Lua::new();
    let t = table(&lua, r#"return { "a", extra = "b" }"#)?;
    assert!(matches!(string_array(&t), Err(ArrayError::NotString(key)) if key == "extra"));
    Ok(())
  }

  #[test]
  fn rejects_positions_past_length() -> LuaResult<()> {
    let lua = Lua::new();
    let t = table(&lua, r#"return { [1] = "a", [5] = "e" }"#)?;
    assert!(matches!(string_array(&t), Err(ArrayError::NotString(pos)) if pos == "5"));
    Ok(())
  }

  #[test]
  fn type_names_match_lua() -> LuaResult<()> {
    let lua = Lua::new();
    let lua_type: LuaFunction = lua.globals().get("type")?;
    for code in ["return 42", "return 4.5", "return 'x'", "return {}", "return true", "return print"] {
      let value: LuaValue = lua.load(code).eval()?;
      assert_eq!(type_name(&value), lua_type.call::<String>(value.clone())?, "{code}");
    }
    Ok(())
  }

  #[test]
  fn index_path_quotes_strings() -> LuaResult<()> {
    let lua = Lua::new();
    let key = LuaValue::String(lua.create_string("CFLAGS")?);
    assert_eq!(index_path("build.extra_variables", &key), r#"build.extra_variables["CFLAGS"]"#);
    assert_eq!(index_path("list", &LuaValue::Integer(3)), "list[3]");
    Ok(())
  }
}
