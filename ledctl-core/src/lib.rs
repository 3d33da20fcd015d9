//! ledctl Core - Plattformunabhängige Logik und Traits
//!
//! Diese Crate enthält KEINE Serial- oder OS-Dependencies.
//! Sie definiert Frame-Codec, Scheduler, Prozess-Guard und Pattern-Registry
//! sowie die Traits, über die die Host-Crate Hardware und Prozesse anbindet.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod guard;
pub mod logic;
pub mod patterns;
pub mod scheduler;
pub mod session;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use error::LedError;
pub use guard::{LoopSignature, ProcessGuard};
pub use logic::{checksum, encode, encode_raw, frame_for, level_to_wire};
pub use patterns::{
    BREATHING_PRESETS, BreathingPreset, ParamSchema, PatternDescriptor, PatternParams, PatternPlan,
};
pub use scheduler::{Advance, Scheduler};
pub use session::{LoopState, PatternSession, SessionReport};
pub use traits::{Clock, FrameWriter, ProcessLister, ProcessSignaller, StopSignal};
pub use types::{
    BAUD_DEFAULT, FRAME_LEN, FRAME_START, Frame, INTER_BYTE_DELAY_DEFAULT, Level, LineConfig,
    Mode, ProcessRecord,
};
