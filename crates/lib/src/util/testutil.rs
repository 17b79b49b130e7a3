//! Test utilities for rockhooks-lib.
//!
//! Provides a scripted stand-in for the package tool and cross-platform
//! helpers for tests that spawn real processes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::pkgconfig::{PkgConfigError, ProcessRunner};

/// Metadata served by [`FakePkgConfig`] for one package.
#[derive(Debug, Default, Clone)]
pub struct FakePackage {
  pub variables: Vec<(String, String)>,
  pub libs: String,
  pub cflags: String,
  pub version: String,
  pub static_libs: String,
}

impl FakePackage {
  pub fn new(version: &str) -> Self {
    FakePackage {
      version: version.to_string(),
      ..Default::default()
    }
  }

  pub fn var(mut self, name: &str, value: &str) -> Self {
    self.variables.push((name.to_string(), value.to_string()));
    self
  }

  pub fn libs(mut self, libs: &str) -> Self {
    self.libs = libs.to_string();
    self
  }

  pub fn cflags(mut self, cflags: &str) -> Self {
    self.cflags = cflags.to_string();
    self
  }

  pub fn static_libs(mut self, static_libs: &str) -> Self {
    self.static_libs = static_libs.to_string();
    self
  }
}

#[derive(Debug, Default)]
struct FakeState {
  packages: Vec<(String, FakePackage)>,
  fail_list: bool,
  fail_query: bool,
  queried: Vec<String>,
}

/// In-memory package tool answering the queries `PkgConfig` issues.
///
/// Clones share state, so a test can keep a handle and change the served
/// metadata after handing a clone to `PkgConfig`.
#[derive(Debug, Default, Clone)]
pub struct FakePkgConfig {
  state: Rc<RefCell<FakeState>>,
}

impl FakePkgConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a package, or replace its metadata if it is already listed.
  pub fn add(&self, name: &str, package: FakePackage) {
    let mut state = self.state.borrow_mut();
    match state.packages.iter_mut().find(|(existing, _)| existing == name) {
      Some(entry) => entry.1 = package,
      None => state.packages.push((name.to_string(), package)),
    }
  }

  /// Make `--list-all` fail as if the tool could not be started.
  pub fn set_fail_list(&self, fail: bool) {
    self.state.borrow_mut().fail_list = fail;
  }

  /// Make every per-package query fail.
  pub fn set_fail_query(&self, fail: bool) {
    self.state.borrow_mut().fail_query = fail;
  }

  /// Packages that received a per-package query, in first-query order.
  pub fn queried(&self) -> Vec<String> {
    self.state.borrow().queried.clone()
  }
}

impl ProcessRunner for FakePkgConfig {
  fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, PkgConfigError> {
    if let [_, .., package] = args {
      let mut state = self.state.borrow_mut();
      if !state.queried.iter().any(|queried| queried.as_str() == *package) {
        state.queried.push(package.to_string());
      }
    }

    let state = self.state.borrow();
    let failed = || PkgConfigError::Failed {
      command: format!("{} {}", program, args.join(" ")),
      code: Some(1),
      stderr: "fake failure".to_string(),
    };

    if let ["--list-all"] = args {
      if state.fail_list {
        return Err(PkgConfigError::Spawn {
          program: program.to_string(),
          source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake tool missing"),
        });
      }
      return Ok(
        state
          .packages
          .iter()
          .map(|(name, _)| format!("{:<20} {} - fake package", name, name))
          .collect(),
      );
    }

    if state.fail_query {
      return Err(failed());
    }

    let Some(package_name) = args.last() else {
      return Err(failed());
    };
    let Some((_, package)) = state.packages.iter().find(|(name, _)| name == *package_name) else {
      return Err(failed());
    };

    let line = |value: &str| -> Result<Vec<String>, PkgConfigError> { Ok(vec![value.to_string()]) };
    match &args[..args.len() - 1] {
      ["--print-variables"] => Ok(package.variables.iter().map(|(name, _)| name.clone()).collect()),
      ["--libs"] => line(package.libs.as_str()),
      ["--cflags"] => line(package.cflags.as_str()),
      ["--modversion"] => line(package.version.as_str()),
      ["--libs", "--static"] => line(package.static_libs.as_str()),
      [flag] => match flag.strip_prefix("--variable=") {
        Some(variable) => package
          .variables
          .iter()
          .find(|(name, _)| name == variable)
          .map_or_else(|| line(""), |(_, value)| line(value.as_str())),
        None => Err(failed()),
      },
      _ => Err(failed()),
    }
  }
}

/// Returns the command and args to echo a message.
#[cfg(unix)]
pub fn echo_program(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_program(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}
