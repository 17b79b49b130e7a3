//! Registry of builtin hooks addressed as `$(name)`.
//!
//! Builtins are registered up front under a name. A builtin is either native
//! Rust code implementing [`BuiltinHook`], or a Lua chunk that evaluates to the
//! hook function, which lets plugins ship builtins written in Lua.

use std::collections::HashMap;
use std::rc::Rc;

use mlua::prelude::*;

use crate::config::Config;
use crate::hooks::types::{HookCallable, HookError, ResolveError};
use crate::lua::{loaders, sandbox};
use crate::pkgconfig::{PkgConfig, PkgConfigHook};
use crate::vars::ExtraVarsHook;

/// Name of the package metadata reconciliation builtin.
pub const PKGCONFIG_HOOK: &str = "pkgconfig";

/// Name of the variable merge builtin.
pub const EXTRA_VARS_HOOK: &str = "extra-vars";

/// A hook implemented in Rust.
pub trait BuiltinHook {
  fn run(&self, lua: &Lua, descriptor: &LuaTable, args: &[String]) -> Result<(), HookError>;
}

impl<F> BuiltinHook for F
where
  F: Fn(&Lua, &LuaTable, &[String]) -> Result<(), HookError>,
{
  fn run(&self, lua: &Lua, descriptor: &LuaTable, args: &[String]) -> Result<(), HookError> {
    self(lua, descriptor, args)
  }
}

enum Builtin {
  Native(Rc<dyn BuiltinHook>),
  Chunk(String),
}

/// Name to implementation mapping consulted for `$(name)` targets.
#[derive(Default)]
pub struct BuiltinRegistry {
  hooks: HashMap<String, Builtin>,
}

impl BuiltinRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding `pkgconfig` and `extra-vars`.
  pub fn with_defaults(config: &Config) -> Self {
    let mut registry = Self::new();
    registry.register(PKGCONFIG_HOOK, PkgConfigHook::new(PkgConfig::system(config)));
    registry.register(EXTRA_VARS_HOOK, ExtraVarsHook);
    registry
  }

  /// Register a native builtin, replacing any previous entry of that name.
  pub fn register(&mut self, name: impl Into<String>, hook: impl BuiltinHook + 'static) {
    self.hooks.insert(name.into(), Builtin::Native(Rc::new(hook)));
  }

  /// Register a builtin whose Lua source returns the hook function.
  pub fn register_chunk(&mut self, name: impl Into<String>, source: impl Into<String>) {
    self.hooks.insert(name.into(), Builtin::Chunk(source.into()));
  }

  pub fn contains(&self, name: &str) -> bool {
    self.hooks.contains_key(name)
  }

  /// Registered names, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Resolve `name` to something callable.
  ///
  /// Lua chunks are evaluated in a fresh execution context on every
  /// resolution.
  pub fn resolve(&self, lua: &Lua, name: &str) -> Result<HookCallable, ResolveError> {
    let load_error = |cause: String| ResolveError::BuiltinLoad {
      name: name.to_string(),
      cause,
    };

    match self.hooks.get(name) {
      None => Err(load_error("no builtin-hook registered under this name".to_string())),
      Some(Builtin::Native(hook)) => Ok(HookCallable::Native(Rc::clone(hook))),
      Some(Builtin::Chunk(source)) => {
        let env = sandbox::create_context(lua).map_err(|e| load_error(e.to_string()))?;
        match loaders::load_builtin_chunk(lua, name, source, env) {
          Ok(LuaValue::Function(func)) => Ok(HookCallable::Lua(func)),
          Ok(_) => Err(ResolveError::BuiltinNotFunction { name: name.to_string() }),
          Err(e) => Err(load_error(e.to_string())),
        }
      }
    }
  }
}
