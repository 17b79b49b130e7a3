use std::io;

use thiserror::Error;

/// Failures running the package tool.
#[derive(Debug, Error)]
pub enum PkgConfigError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("{command} exited with status {code:?}: {stderr}")]
  Failed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}
