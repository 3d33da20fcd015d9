// Task-Modul: Administrative Operationen des Tools
//
// Jede Operation ist ein eigenständiger Einstiegspunkt, den die CLI aufruft.
// Pattern-Schleifen laufen blockierend im eigenen Prozess.

pub mod background;
pub mod builtin;
pub mod guard;
pub mod pattern_loop;

// Re-export Tasks für einfachen Import
pub use background::{child_args, spawn_background};
pub use builtin::send_builtin;
pub use guard::{host_guard, kill_all_patterns, running_patterns};
pub use pattern_loop::{run_pattern, run_pattern_with};
