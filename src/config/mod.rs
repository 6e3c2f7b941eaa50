//! Configuration for tree induction and boosting.
//!
//! Parameters are built in code with [`ParamsBuilder`], read from a JSON or
//! TOML file, or overridden from `DTREE_*` environment variables.

pub mod core;

pub use self::core::{ParamsBuilder, TreeParams};

/// Default parameter file name looked up by the command-line front end
pub const DEFAULT_CONFIG_FILE: &str = "dtree.toml";

/// Default model file name written by the command-line front end
pub const DEFAULT_MODEL_FILE: &str = "model.json";
