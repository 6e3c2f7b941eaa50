//! Core infrastructure module for dtree-gbdt.
//!
//! This module provides the foundational pieces used by every other module:
//!
//! - [`types`]: Type aliases and small enumerations
//! - [`constants`]: Parameter defaults and search sentinels
//! - [`error`]: The crate error type
//! - [`observer`]: Structured training events and their receivers
//!
//! ```rust
//! use dtree_gbdt::core::{
//!     constants::DEFAULT_LEARNING_RATE,
//!     error::{DTreeError, Result},
//!     types::TreeKind,
//! };
//!
//! let kind = TreeKind::Classification;
//! assert!(DEFAULT_LEARNING_RATE > 0.0);
//! # let _ = kind;
//! ```

pub mod constants;
pub mod error;
pub mod observer;
pub mod types;

pub use constants::*;
pub use error::{DTreeError, Result};
pub use observer::{LogObserver, NoopObserver, RecordingObserver, TrainingEvent, TrainingObserver};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Version information for the core module
pub const CORE_MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

static CORE_INIT: Once = Once::new();
static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging for the process.
///
/// Sets `RUST_LOG` to `info` when it is unset and installs `env_logger`.
/// Calling this more than once, or after another logger was installed, is
/// harmless.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }
        // Another logger may already be installed (tests, host binaries).
        let _ = env_logger::try_init();
        CORE_INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!("dtree-gbdt core {} initialized", CORE_MODULE_VERSION);
    });
    Ok(())
}

/// Check if the core module is initialized
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}
