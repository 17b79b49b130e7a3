use mlua::prelude::*;
use thiserror::Error;

/// A variable value that is neither a string nor an array of strings.
#[derive(Debug, Error)]
pub enum ValueError {
  #[error("variable-value must be a string or an array of strings")]
  InvalidType,

  #[error("variable-value#{0} must be a string")]
  InvalidElement(String),

  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}

/// Configuration errors in `extra_variables` / `conditional_variables`.
#[derive(Debug, Error)]
pub enum VarsError {
  #[error("{path} must be a table")]
  NotATable { path: String },

  #[error("{path}: variable-name must be a string")]
  InvalidName { path: String },

  #[error("{path}: flag-name must be a string")]
  InvalidFlag { path: String },

  #[error("{path}: {source}")]
  InvalidValue {
    path: String,
    #[source]
    source: ValueError,
  },

  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}
