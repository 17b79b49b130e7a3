//! Additive merging of build variables.
//!
//! `build.extra_variables` appends flags to variables that already hold a
//! non-empty string, and `build.conditional_variables` does the same for
//! groups enabled through environment flags:
//!
//! ```lua
//! build = {
//!   extra_variables = { CFLAGS = { "-Wall", "-Wextra" } },
//!   conditional_variables = {
//!     MYLIB_COVERAGE = { CFLAGS = "--coverage", LIBFLAG = "--coverage" },
//!   },
//! }
//! ```

pub mod hook;
pub mod merge;
pub mod types;

pub use hook::ExtraVarsHook;
pub use merge::{append, append_conditional, flag_enabled, normalize};
pub use types::{ValueError, VarsError};
