//! The `$(pkgconfig)` builtin hook.

use mlua::prelude::*;
use tracing::debug;

use crate::hooks::{BuiltinHook, HookError};
use crate::pkgconfig::reconcile::reconcile;
use crate::pkgconfig::tool::PkgConfig;

/// Reconciles the variables of every external dependency.
pub struct PkgConfigHook {
  tool: PkgConfig,
}

impl PkgConfigHook {
  pub fn new(tool: PkgConfig) -> Self {
    PkgConfigHook { tool }
  }
}

impl BuiltinHook for PkgConfigHook {
  fn run(&self, lua: &Lua, descriptor: &LuaTable, args: &[String]) -> Result<(), HookError> {
    if !args.is_empty() {
      debug!(?args, "pkgconfig takes no arguments, ignoring them");
    }
    reconcile(lua, &self.tool, descriptor)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{FakePackage, FakePkgConfig};

  #[test]
  fn runs_reconciliation() -> LuaResult<()> {
    let lua = Lua::new();
    let fake = FakePkgConfig::new();
    fake.add("libpng", FakePackage::new("1.6.43").var("includedir", "/usr/include/libpng16"));
    let hook = PkgConfigHook::new(PkgConfig::new("pkg-config", fake));
    let spec: LuaTable = lua
      .load(r#"return { external_dependencies = { LIBPNG = { header = "png.h" } } }"#)
      .eval()?;

    hook.run(&lua, &spec, &[]).unwrap();

    let variables: LuaTable = spec.get("variables")?;
    assert_eq!(variables.get::<String>("LIBPNG_INCDIR")?, "/usr/include/libpng16");
    assert_eq!(variables.get::<String>("LIBPNG_VERSION")?, "1.6.43");
    Ok(())
  }
}
