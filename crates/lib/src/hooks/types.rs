//! Types shared by hook parsing and execution.

use std::fmt;
use std::rc::Rc;

use mlua::prelude::*;
use thiserror::Error;

use crate::hooks::registry::BuiltinHook;
use crate::vars::VarsError;
use crate::workdir::WorkDirError;

/// Reasons a single hook reference cannot be turned into a callable.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("empty hook reference")]
  Empty,

  #[error("Invalid builtin hook syntax: {0}")]
  InvalidBuiltinSyntax(String),

  #[error("Invalid builtin hook syntax: missing name")]
  MissingBuiltinName,

  #[error("Failed to load builtin-hook `{name}`: {cause}")]
  BuiltinLoad { name: String, cause: String },

  #[error("Invalid builtin-hook `{name}`: not a function")]
  BuiltinNotFunction { name: String },

  #[error("hook script not found: {path}")]
  ScriptNotFound { path: String },

  #[error("Failed to load hook script `{path}`: {source}")]
  ScriptLoad {
    path: String,
    #[source]
    source: LuaError,
  },
}

/// Errors surfaced by the hook pipeline.
#[derive(Debug, Error)]
pub enum HookError {
  /// A hook field is a table that is not a plain array of strings.
  #[error("{field} must be an array of strings")]
  NotStringArray { field: String },

  /// A hook field is neither a string nor a table.
  #[error("Invalid hook type: {0}")]
  InvalidHookType(&'static str),

  /// A hook reference failed to resolve.
  #[error("{name}: {source}")]
  Resolve {
    name: String,
    #[source]
    source: ResolveError,
  },

  /// A hook raised an error while running.
  #[error("Failed to run \"{name}\": {message}")]
  RunFailed { name: String, message: String },

  /// The standard build failed; its message is kept verbatim.
  #[error("{0}")]
  Build(#[source] LuaError),

  #[error(transparent)]
  Vars(#[from] VarsError),

  #[error(transparent)]
  WorkDir(#[from] WorkDirError),

  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}

/// Whether a hook came from the builtin registry or from a script file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
  Builtin,
  Script,
}

impl HookKind {
  pub fn as_str(self) -> &'static str {
    match self {
      HookKind::Builtin => "builtin",
      HookKind::Script => "script",
    }
  }
}

impl fmt::Display for HookKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The code a hook reference resolved to.
#[derive(Clone)]
pub enum HookCallable {
  /// A builtin implemented in Rust.
  Native(Rc<dyn BuiltinHook>),
  /// A Lua function: a compiled hook script or a Lua-backed builtin.
  Lua(LuaFunction),
}

impl fmt::Debug for HookCallable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HookCallable::Native(_) => f.write_str("Native(..)"),
      HookCallable::Lua(func) => f.debug_tuple("Lua").field(func).finish(),
    }
  }
}

/// A parsed hook reference, ready to run once.
#[derive(Debug, Clone)]
pub struct HookDescriptor {
  /// `before_build`, or `before_build#2` when the field is a list.
  pub display_name: String,
  /// The reference with whitespace runs collapsed to single spaces.
  pub original_value: String,
  /// Script path or `$(name)` marker.
  pub target: String,
  pub arguments: Vec<String>,
  pub kind: HookKind,
  pub callable: HookCallable,
}

impl HookDescriptor {
  /// Run the hook against `descriptor`.
  ///
  /// Lua hooks are called as `hook(descriptor, args...)`; any error they raise,
  /// including mlua's captured traceback, becomes [`HookError::RunFailed`].
  pub fn invoke(&self, lua: &Lua, descriptor: &LuaTable) -> Result<(), HookError> {
    let outcome = match &self.callable {
      HookCallable::Native(hook) => hook.run(lua, descriptor, &self.arguments).map_err(|e| e.to_string()),
      HookCallable::Lua(func) => call_lua_hook(lua, func, descriptor, &self.arguments).map_err(|e| e.to_string()),
    };

    outcome.map_err(|message| HookError::RunFailed {
      name: self.display_name.clone(),
      message,
    })
  }
}

fn call_lua_hook(lua: &Lua, func: &LuaFunction, descriptor: &LuaTable, arguments: &[String]) -> LuaResult<()> {
  let mut args = Vec::with_capacity(arguments.len() + 1);
  args.push(LuaValue::Table(descriptor.clone()));
  for argument in arguments {
    args.push(LuaValue::String(lua.create_string(argument)?));
  }
  func.call::<()>(LuaMultiValue::from_vec(args))
}
