//! Fehler-Typ der Core-Crate

use alloc::string::String;
use core::fmt;

/// Alle Fehler, die in der Core-Logik entstehen können
///
/// - Eingabefehler (`InvalidLevel`, `UnknownMode`, `UnknownPattern`, ...)
///   werden sofort gemeldet und nie wiederholt.
/// - `WriteFailed` bricht einen halb gesendeten Frame ab; die Verbindung
///   wird danach geschlossen.
/// - `ProcessTable` / `SignalFailed` werden vom Guard nur geloggt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedError {
    /// Stufe außerhalb 1..=5
    InvalidLevel(u8),
    /// Mode-Byte ist keiner der fünf bekannten Wire-Codes
    UnknownMode(u8),
    /// Modus-Name unbekannt
    UnknownModeName(String),
    /// Kein Pattern mit diesem Namen registriert
    UnknownPattern(String),
    /// Breathing-Preset außerhalb 1..=4
    InvalidPreset(u8),
    /// Parameter passt nicht zum Schema des Patterns
    InvalidParameter(&'static str),
    /// Preset-Tabelle verletzt ihre Invarianten
    InvalidPresetTable(&'static str),
    /// Schreiben des Bytes `byte_index` ist fehlgeschlagen
    WriteFailed { byte_index: usize },
    /// Senden auf einer bereits geschlossenen Verbindung
    NotOpen,
    /// Prozesstabelle konnte nicht gelesen werden
    ProcessTable,
    /// Signal konnte nicht zugestellt werden
    SignalFailed { pid: u32 },
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel(v) => write!(f, "level {v} out of range (expected 1..5)"),
            Self::UnknownMode(code) => write!(f, "unknown mode byte 0x{code:02X}"),
            Self::UnknownModeName(name) => write!(
                f,
                "unknown mode '{name}' (valid: rainbow, breathing, cycle, off, auto)"
            ),
            Self::UnknownPattern(name) => write!(f, "unknown pattern '{name}'"),
            Self::InvalidPreset(v) => write!(f, "preset {v} out of range (expected 1..4)"),
            Self::InvalidParameter(what) => write!(f, "invalid parameter: {what}"),
            Self::InvalidPresetTable(what) => write!(f, "invalid preset table: {what}"),
            Self::WriteFailed { byte_index } => {
                write!(f, "serial write failed at frame byte {byte_index}")
            }
            Self::NotOpen => f.write_str("connection is closed"),
            Self::ProcessTable => f.write_str("process table unavailable"),
            Self::SignalFailed { pid } => write!(f, "failed to signal pid {pid}"),
        }
    }
}

impl core::error::Error for LedError {}
