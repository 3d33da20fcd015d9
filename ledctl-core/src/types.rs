//! Core Types für die LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use alloc::string::String;
use core::fmt;
use core::time::Duration;

use crate::error::LedError;

/// Startbyte jedes Frames
pub const FRAME_START: u8 = 0xFA;

/// Länge eines Frames in Bytes
pub const FRAME_LEN: usize = 5;

/// Standard-Baudrate des Controllers
pub const BAUD_DEFAULT: u32 = 10_000;

/// Standard-Pause zwischen zwei Bytes eines Frames
pub const INTER_BYTE_DELAY_DEFAULT: Duration = Duration::from_millis(5);

// ============================================================================
// Mode
// ============================================================================

/// Eingebaute Firmware-Modi mit ihrem Wire-Code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Rainbow = 0x01,
    Breathing = 0x02,
    Cycle = 0x03,
    Off = 0x04,
    Auto = 0x05,
}

impl Mode {
    /// Alle Modi in Wire-Code-Reihenfolge
    pub const ALL: [Mode; 5] = [
        Mode::Rainbow,
        Mode::Breathing,
        Mode::Cycle,
        Mode::Off,
        Mode::Auto,
    ];

    /// Das Byte, das auf der Leitung übertragen wird
    pub const fn wire_code(self) -> u8 {
        self as u8
    }

    /// Kurzname, wie er auf der Kommandozeile verwendet wird
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Rainbow => "rainbow",
            Mode::Breathing => "breathing",
            Mode::Cycle => "cycle",
            Mode::Off => "off",
            Mode::Auto => "auto",
        }
    }

    /// Sucht einen Modus anhand des Kurznamens (Groß-/Kleinschreibung egal)
    pub fn from_name(name: &str) -> Result<Self, LedError> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| LedError::UnknownModeName(String::from(name)))
    }
}

impl TryFrom<u8> for Mode {
    type Error = LedError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|m| m.wire_code() == code)
            .ok_or(LedError::UnknownMode(code))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Level
// ============================================================================

/// Menschliche Stufe 1..=5 für Helligkeit oder Geschwindigkeit
///
/// Die Skala ist auf der Leitung invertiert: Stufe 1 → 0x05, Stufe 5 → 0x01.
/// Ein `Level` kann nur über [`Level::new`] bzw. `TryFrom<u8>` entstehen,
/// ist also immer gültig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    pub const fn new(value: u8) -> Result<Self, LedError> {
        if value >= 1 && value <= 5 {
            Ok(Level(value))
        } else {
            Err(LedError::InvalidLevel(value))
        }
    }

    /// Für Konstanten-Tabellen; ungültige Werte brechen die Kompilierung ab
    pub(crate) const fn from_const(value: u8) -> Self {
        assert!(value >= 1 && value <= 5, "level out of range");
        Level(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Wire-Wert der Stufe (invertierte Skala)
    pub const fn to_wire(self) -> u8 {
        6 - self.0
    }
}

impl TryFrom<u8> for Level {
    type Error = LedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Fertiges 5-Byte Kommando `[0xFA, mode, bright, speed, checksum]`
///
/// Wird pro Sendevorgang neu gebaut und nie verändert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub(crate) const fn from_parts(mode: u8, bright_wire: u8, speed_wire: u8, checksum: u8) -> Self {
        Frame([FRAME_START, mode, bright_wire, speed_wire, checksum])
    }

    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub const fn mode_byte(&self) -> u8 {
        self.0[1]
    }

    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Hex-Darstellung für Logs: `FA 03 03 03 03`
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

// ============================================================================
// LineConfig
// ============================================================================

/// Parameter einer seriellen Sitzung
///
/// Gehört exklusiv der Transport-Instanz, die sie benutzt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineConfig {
    /// Gerätepfad; `None` = über die Port-Suche auflösen
    pub port: Option<String>,
    pub baud: u32,
    pub dtr: bool,
    pub rts: bool,
    pub inter_byte_delay: Duration,
    /// `true` wenn `inter_byte_delay` explizit vom Aufrufer gesetzt wurde
    pub delay_explicit: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: BAUD_DEFAULT,
            dtr: true,
            rts: false,
            inter_byte_delay: INTER_BYTE_DELAY_DEFAULT,
            delay_explicit: false,
        }
    }
}

impl LineConfig {
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Setzt die Pause zwischen zwei Bytes und markiert sie als explizit
    pub fn with_inter_byte_delay(mut self, delay: Duration) -> Self {
        self.inter_byte_delay = delay;
        self.delay_explicit = true;
        self
    }
}

// ============================================================================
// ProcessRecord
// ============================================================================

/// Momentaufnahme eines Host-Prozesses (nur transient vom Guard genutzt)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProcessRecord {
    pub pid: u32,
    pub cmdline: String,
}

impl ProcessRecord {
    pub fn new(pid: u32, cmdline: impl Into<String>) -> Self {
        Self {
            pid,
            cmdline: cmdline.into(),
        }
    }
}
