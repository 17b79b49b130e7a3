//! Package tool invocation and package name resolution.

use std::collections::BTreeMap;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::pkgconfig::types::PkgConfigError;

/// Metadata field names accepted from the package tool.
static FIELD_NAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern is valid"));

/// Runs a program and returns its standard output as lines.
pub trait ProcessRunner {
  fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, PkgConfigError>;
}

/// [`ProcessRunner`] backed by real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, PkgConfigError> {
    debug!(program = %program, ?args, "spawning process");

    let output = Command::new(program)
      .args(args)
      .output()
      .map_err(|source| PkgConfigError::Spawn {
        program: program.to_string(),
        source,
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      return Err(PkgConfigError::Failed {
        command: format!("{} {}", program, args.join(" ")),
        code: output.status.code(),
        stderr,
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect())
  }
}

/// Outcome of looking a package up by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackageLookup {
  /// The package name as the tool knows it, if one matched.
  pub name: Option<String>,
  /// Packages whose names contain the requested name, in tool output order.
  pub suggestions: Vec<String>,
}

/// Queries against the package tool.
pub struct PkgConfig {
  program: String,
  runner: Box<dyn ProcessRunner>,
}

impl PkgConfig {
  pub fn new(program: impl Into<String>, runner: impl ProcessRunner + 'static) -> Self {
    PkgConfig {
      program: program.into(),
      runner: Box::new(runner),
    }
  }

  /// The configured tool, run as a real subprocess.
  pub fn system(config: &Config) -> Self {
    Self::new(config.pkg_config.clone(), SystemRunner)
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  fn query(&self, args: &[&str]) -> Result<Vec<String>, PkgConfigError> {
    self.runner.run(&self.program, args)
  }

  /// Single-valued query, joined and trimmed.
  fn query_value(&self, args: &[&str]) -> Result<String, PkgConfigError> {
    Ok(self.query(args)?.join(" ").trim().to_string())
  }

  /// Names of every package the tool knows about.
  pub fn list_packages(&self) -> Result<Vec<String>, PkgConfigError> {
    let lines = self.query(&["--list-all"])?;
    Ok(
      lines
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect(),
    )
  }

  /// Resolve `name` against the known packages, ignoring case.
  ///
  /// A case-sensitive exact match wins immediately. Otherwise the first
  /// case-insensitive exact match is used, and every package containing
  /// `name` is offered as a suggestion. A tool that cannot be run resolves
  /// nothing.
  pub fn find_package(&self, name: &str) -> PackageLookup {
    let packages = match self.list_packages() {
      Ok(packages) => packages,
      Err(err) => {
        warn!(error = %err, "cannot list packages");
        return PackageLookup::default();
      }
    };

    let needle = name.to_lowercase();
    let mut lookup = PackageLookup::default();

    for candidate in packages {
      let lowered = candidate.to_lowercase();
      if !lowered.contains(&needle) {
        continue;
      }
      if candidate == name {
        lookup.name = Some(candidate);
        return lookup;
      }
      if lookup.name.is_none() && lowered == needle {
        lookup.name = Some(candidate.clone());
      }
      lookup.suggestions.push(candidate);
    }

    lookup
  }

  /// Every declared variable of `package` plus the computed fields `libs`,
  /// `cflags`, `version` and `static_libs`.
  pub fn metadata(&self, package: &str) -> Result<BTreeMap<String, String>, PkgConfigError> {
    let mut fields = BTreeMap::new();

    for variable in self.query(&["--print-variables", package])? {
      let variable = variable.trim();
      if variable.is_empty() {
        continue;
      }
      if !FIELD_NAME.is_match(variable) {
        debug!(package = %package, variable = %variable, "skipping variable with unusable name");
        continue;
      }
      let flag = format!("--variable={}", variable);
      fields.insert(variable.to_string(), self.query_value(&[flag.as_str(), package])?);
    }

    fields.insert("libs".to_string(), self.query_value(&["--libs", package])?);
    fields.insert("cflags".to_string(), self.query_value(&["--cflags", package])?);
    fields.insert("version".to_string(), self.query_value(&["--modversion", package])?);
    fields.insert("static_libs".to_string(), self.query_value(&["--libs", "--static", package])?);

    Ok(fields)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{FakePackage, FakePkgConfig, echo_program};

  fn tool(fake: &FakePkgConfig) -> PkgConfig {
    PkgConfig::new("pkg-config", fake.clone())
  }

  mod system_runner {
    use super::*;

    #[test]
    fn captures_stdout_lines() {
      let (program, args) = echo_program("hello");
      let args: Vec<&str> = args.iter().map(String::as_str).collect();
      let lines = SystemRunner.run(program, &args).unwrap();
      assert_eq!(lines, vec!["hello"]);
    }

    #[test]
    fn missing_program_is_spawn_error() {
      let err = SystemRunner.run("/nonexistent/pkg-config", &["--list-all"]).unwrap_err();
      assert!(matches!(err, PkgConfigError::Spawn { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn non_zero_exit_is_failure() {
      let err = SystemRunner.run("/bin/sh", &["-c", "echo nope >&2; exit 3"]).unwrap_err();
      assert!(matches!(err, PkgConfigError::Failed { code: Some(3), ref stderr, .. } if stderr == "nope"));
    }
  }

  mod find_package {
    use super::*;

    #[test]
    fn exact_match_wins() {
      let fake = FakePkgConfig::new();
      fake.add("ZLIB", FakePackage::new("1.0"));
      fake.add("zlib", FakePackage::new("1.3"));

      let lookup = tool(&fake).find_package("zlib");

      assert_eq!(lookup.name.as_deref(), Some("zlib"));
    }

    #[test]
    fn case_insensitive_match_resolves() {
      let fake = FakePkgConfig::new();
      fake.add("zlib-ng", FakePackage::new("2.0"));
      fake.add("zlib", FakePackage::new("1.3"));

      let lookup = tool(&fake).find_package("ZLIB");

      assert_eq!(lookup.name.as_deref(), Some("zlib"));
      assert_eq!(lookup.suggestions, vec!["zlib-ng", "zlib"]);
    }

    #[test]
    fn first_case_insensitive_match_wins() {
      let fake = FakePkgConfig::new();
      fake.add("Foo", FakePackage::new("1"));
      fake.add("FOO", FakePackage::new("2"));

      let lookup = tool(&fake).find_package("foo");

      assert_eq!(lookup.name.as_deref(), Some("Foo"));
    }

    #[test]
    fn partial_matches_are_suggestions() {
      let fake = FakePkgConfig::new();
      fake.add("libssl", FakePackage::new("3.0"));
      fake.add("openssl", FakePackage::new("3.0"));
      fake.add("zlib", FakePackage::new("1.3"));

      let lookup = tool(&fake).find_package("SSL");

      assert_eq!(lookup.name, None);
      assert_eq!(lookup.suggestions, vec!["libssl", "openssl"]);
    }

    #[test]
    fn broken_tool_resolves_nothing() {
      let fake = FakePkgConfig::new();
      fake.add("zlib", FakePackage::new("1.3"));
      fake.set_fail_list(true);

      assert_eq!(tool(&fake).find_package("zlib"), PackageLookup::default());
    }
  }

  mod metadata {
    use super::*;

    #[test]
    fn collects_variables_and_computed_fields() {
      let fake = FakePkgConfig::new();
      fake.add(
        "zlib",
        FakePackage::new("1.3")
          .var("prefix", "/usr")
          .var("includedir", "/usr/include")
          .libs("-lz")
          .cflags("-I/usr/include")
          .static_libs("-lz -lm"),
      );

      let fields = tool(&fake).metadata("zlib").unwrap();

      assert_eq!(fields.get("prefix").map(String::as_str), Some("/usr"));
      assert_eq!(fields.get("includedir").map(String::as_str), Some("/usr/include"));
      assert_eq!(fields.get("libs").map(String::as_str), Some("-lz"));
      assert_eq!(fields.get("cflags").map(String::as_str), Some("-I/usr/include"));
      assert_eq!(fields.get("version").map(String::as_str), Some("1.3"));
      assert_eq!(fields.get("static_libs").map(String::as_str), Some("-lz -lm"));
    }

    #[test]
    fn skips_unusable_variable_names() {
      let fake = FakePkgConfig::new();
      fake.add("zlib", FakePackage::new("1.3").var("bad-name", "x").var("_ok1", "y"));

      let fields = tool(&fake).metadata("zlib").unwrap();

      assert!(!fields.contains_key("bad-name"));
      assert_eq!(fields.get("_ok1").map(String::as_str), Some("y"));
    }

    #[test]
    fn query_failure_is_an_error() {
      let fake = FakePkgConfig::new();
      fake.add("zlib", FakePackage::new("1.3"));
      fake.set_fail_query(true);

      assert!(tool(&fake).metadata("zlib").is_err());
    }
  }
}
