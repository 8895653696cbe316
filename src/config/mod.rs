//! Project configuration
//!
//! The optional `gen.toml` at the project root supplies defaults for the
//! CMake invocations. Command-line flags always take precedence.

mod gen_toml;

pub use gen_toml::GenConfig;
