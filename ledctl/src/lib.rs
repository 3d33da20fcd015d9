// Library-Root: Host-Seite von ledctl
// Serial-Transport, Prozess-Guard, Konfiguration und CLI

// Module
pub mod cli;
pub mod config;
pub mod error;
pub mod hal;
pub mod listing;
pub mod tasks;

// Re-exports von ledctl-core
pub use ledctl_core::{Frame, LedError, LineConfig, Mode, PatternParams, SessionReport};

// Administrative Operationen
pub use error::{Error, Result};
pub use listing::list_patterns;
pub use tasks::{kill_all_patterns, run_pattern, send_builtin};
