//! Runtime configuration read from the environment.

use std::env;

/// Environment variable naming the package tool binary.
pub const PKG_CONFIG_ENV: &str = "PKG_CONFIG";

/// Package tool used when [`PKG_CONFIG_ENV`] is unset or blank.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";

/// Settings shared by the builtin hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Program invoked for package metadata queries.
  pub pkg_config: String,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      pkg_config: DEFAULT_PKG_CONFIG.to_string(),
    }
  }
}

impl Config {
  /// Read configuration from the process environment.
  pub fn from_env() -> Self {
    let pkg_config = env::var(PKG_CONFIG_ENV)
      .ok()
      .map(|value| value.trim().to_string())
      .filter(|value| !value.is_empty())
      .unwrap_or_else(|| DEFAULT_PKG_CONFIG.to_string());

    Config { pkg_config }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn defaults_to_pkg_config() {
    temp_env::with_var(PKG_CONFIG_ENV, None::<&str>, || {
      assert_eq!(Config::from_env().pkg_config, "pkg-config");
    });
  }

  #[test]
  #[serial]
  fn honours_pkg_config_override() {
    temp_env::with_var(PKG_CONFIG_ENV, Some("/opt/bin/pkgconf"), || {
      assert_eq!(Config::from_env().pkg_config, "/opt/bin/pkgconf");
    });
  }

  #[test]
  #[serial]
  fn blank_override_falls_back() {
    temp_env::with_var(PKG_CONFIG_ENV, Some("   "), || {
      assert_eq!(Config::from_env(), Config::default());
    });
  }
}
