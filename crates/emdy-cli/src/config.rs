//! Assembles the setup form from built-in defaults, a TOML config file,
//! `--set` overrides and command-line flags, in increasing priority.

mod builder;
mod file;

pub use builder::build_config;
