//! Scoped change of the process working directory.
//!
//! Hooks run with the build's target directory as the working directory.
//! [`WorkingDir`] saves the current directory on entry and restores it when
//! popped, or when dropped on any other exit path.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WorkDirError {
  #[error("cannot determine current directory: {0}")]
  CurrentDir(#[source] io::Error),

  #[error("cannot change directory to {}: {source}", .path.display())]
  Change {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Guard for a pushed working directory.
#[derive(Debug)]
pub struct WorkingDir {
  previous: PathBuf,
  restored: bool,
}

impl WorkingDir {
  /// Change into `path`, remembering the current directory.
  pub fn push(path: &Path) -> Result<Self, WorkDirError> {
    let previous = env::current_dir().map_err(WorkDirError::CurrentDir)?;
    env::set_current_dir(path).map_err(|source| WorkDirError::Change {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(from = %previous.display(), to = %path.display(), "changed working directory");

    Ok(WorkingDir {
      previous,
      restored: false,
    })
  }

  /// The directory that will be restored.
  pub fn previous(&self) -> &Path {
    &self.previous
  }

  /// Restore the previous directory and report whether that worked.
  pub fn pop(mut self) -> Result<(), WorkDirError> {
    self.restored = true;
    env::set_current_dir(&self.previous).map_err(|source| WorkDirError::Change {
      path: self.previous.clone(),
      source,
    })?;
    debug!(to = %self.previous.display(), "restored working directory");
    Ok(())
  }
}

impl Drop for WorkingDir {
  fn drop(&mut self) {
    if self.restored {
      return;
    }
    if let Err(err) = env::set_current_dir(&self.previous) {
      warn!(path = %self.previous.display(), error = %err, "failed to restore working directory");
    }
  }
}
