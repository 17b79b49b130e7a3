//! Parsing hook references into descriptors.
//!
//! A hook field (`build.before_build`, `build.after_build`) holds a single
//! reference or an array of them. Each reference is `TARGET ARG*`, split on
//! whitespace, where `TARGET` is a script path or a builtin marker `$(name)`.

use std::path::Path;
use std::sync::LazyLock;

use mlua::prelude::*;
use regex::Regex;

use crate::descriptor;
use crate::hooks::registry::BuiltinRegistry;
use crate::hooks::types::{HookCallable, HookDescriptor, HookError, HookKind, ResolveError};
use crate::lua::values::{ArrayError, string_array, type_name};
use crate::lua::{loaders, sandbox};

static BUILTIN_TARGET: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\$\(([^)\s]*)\)$").expect("builtin hook pattern is valid"));

/// What a hook target points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
  Builtin(&'a str),
  Script(&'a str),
}

/// Classify a target token.
///
/// Anything starting with `$(` must be a complete builtin marker; everything
/// else is a script path.
pub fn parse_target(target: &str) -> Result<Target<'_>, ResolveError> {
  if !target.starts_with("$(") {
    return Ok(Target::Script(target));
  }

  let captures = BUILTIN_TARGET
    .captures(target)
    .ok_or_else(|| ResolveError::InvalidBuiltinSyntax(target.to_string()))?;
  let name = captures.get(1).map_or("", |m| m.as_str());
  if name.is_empty() {
    return Err(ResolveError::MissingBuiltinName);
  }

  Ok(Target::Builtin(name))
}

/// Parse and resolve every hook configured in `build.<field>`.
///
/// Returns an empty list when the field (or `build` itself) is absent.
pub fn parse_hooks(
  lua: &Lua,
  descriptor: &LuaTable,
  field: &str,
  registry: &BuiltinRegistry,
) -> Result<Vec<HookDescriptor>, HookError> {
  let Some(build) = descriptor::build_table(descriptor)? else {
    return Ok(Vec::new());
  };

  let (references, listed) = match build.get::<LuaValue>(field)? {
    LuaValue::Nil => return Ok(Vec::new()),
    LuaValue::String(reference) => (vec![reference.to_str()?.to_string()], false),
    LuaValue::Table(list) => match string_array(&list) {
      Ok(references) => (references, true),
      Err(ArrayError::NotString(_)) => {
        return Err(HookError::NotStringArray {
          field: field.to_string(),
        });
      }
      Err(ArrayError::Lua(e)) => return Err(e.into()),
    },
    other => return Err(HookError::InvalidHookType(type_name(&other))),
  };

  references
    .iter()
    .enumerate()
    .map(|(index, reference)| {
      let display_name = if listed {
        format!("{}#{}", field, index + 1)
      } else {
        field.to_string()
      };
      parse_reference(lua, reference, display_name, registry)
    })
    .collect()
}

/// Parse one reference and resolve its target.
pub fn parse_reference(
  lua: &Lua,
  reference: &str,
  display_name: String,
  registry: &BuiltinRegistry,
) -> Result<HookDescriptor, HookError> {
  let tokens: Vec<&str> = reference.split_whitespace().collect();

  let resolved = match tokens.split_first() {
    Some((target, _)) => resolve_target(lua, target, registry),
    None => Err(ResolveError::Empty),
  };
  let (kind, callable) = match resolved {
    Ok(resolved) => resolved,
    Err(source) => {
      return Err(HookError::Resolve {
        name: display_name,
        source,
      });
    }
  };

  Ok(HookDescriptor {
    display_name,
    original_value: tokens.join(" "),
    target: tokens[0].to_string(),
    arguments: tokens[1..].iter().map(|arg| arg.to_string()).collect(),
    kind,
    callable,
  })
}

fn resolve_target(
  lua: &Lua,
  target: &str,
  registry: &BuiltinRegistry,
) -> Result<(HookKind, HookCallable), ResolveError> {
  match parse_target(target)? {
    Target::Builtin(name) => Ok((HookKind::Builtin, registry.resolve(lua, name)?)),
    Target::Script(path) => {
      let script = Path::new(path);
      if !script.exists() {
        return Err(ResolveError::ScriptNotFound { path: path.to_string() });
      }

      let load_error = |source| ResolveError::ScriptLoad {
        path: path.to_string(),
        source,
      };
      let env = sandbox::create_context(lua).map_err(load_error)?;
      let func = loaders::load_hook_script(lua, script, env).map_err(load_error)?;
      Ok((HookKind::Script, HookCallable::Lua(func)))
    }
  }
}
