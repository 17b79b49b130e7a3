//! The `$(extra-vars)` builtin hook.

use mlua::prelude::*;
use tracing::debug;

use crate::descriptor;
use crate::hooks::{BuiltinHook, HookError};
use crate::vars::merge::{append, append_conditional};
use crate::vars::types::VarsError;

const EXTRA_VARIABLES: &str = "build.extra_variables";
const CONDITIONAL_VARIABLES: &str = "build.conditional_variables";

/// Applies `build.extra_variables`, then `build.conditional_variables`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtraVarsHook;

impl BuiltinHook for ExtraVarsHook {
  fn run(&self, lua: &Lua, descriptor: &LuaTable, args: &[String]) -> Result<(), HookError> {
    if !args.is_empty() {
      debug!(?args, "extra-vars takes no arguments, ignoring them");
    }

    let Some(build) = descriptor::build_table(descriptor)? else {
      return Ok(());
    };
    let variables = descriptor::variables(lua, descriptor)?;

    match build.get::<LuaValue>("extra_variables")? {
      LuaValue::Nil => {}
      LuaValue::Table(entries) => append(&variables, &entries, EXTRA_VARIABLES)?,
      _ => {
        return Err(
          VarsError::NotATable {
            path: EXTRA_VARIABLES.to_string(),
          }
          .into(),
        );
      }
    }

    match build.get::<LuaValue>("conditional_variables")? {
      LuaValue::Nil => {}
      LuaValue::Table(flags) => append_conditional(&variables, &flags, CONDITIONAL_VARIABLES)?,
      _ => {
        return Err(
          VarsError::NotATable {
            path: CONDITIONAL_VARIABLES.to_string(),
          }
          .into(),
        );
      }
    }

    Ok(())
  }
}
