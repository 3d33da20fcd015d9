//! Frame-Codec - Pure Business Logic
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::error::LedError;
use crate::types::{FRAME_START, Frame, Level, Mode};

/// Wandelt eine menschliche Stufe 1..=5 in den Wire-Wert 0x05..=0x01
///
/// # Beispiele
///
/// ```
/// # use ledctl_core::level_to_wire;
/// assert_eq!(level_to_wire(1), Ok(0x05));
/// assert_eq!(level_to_wire(5), Ok(0x01));
/// assert!(level_to_wire(6).is_err());
/// ```
pub fn level_to_wire(level: u8) -> Result<u8, LedError> {
    Level::new(level).map(Level::to_wire)
}

/// Additive Prüfsumme über Startbyte und Nutzdaten (mod 256)
pub const fn checksum(mode_byte: u8, bright_wire: u8, speed_wire: u8) -> u8 {
    FRAME_START
        .wrapping_add(mode_byte)
        .wrapping_add(bright_wire)
        .wrapping_add(speed_wire)
}

/// Baut einen Frame aus bereits validierten Stufen
pub const fn frame_for(mode: Mode, brightness: Level, speed: Level) -> Frame {
    let mode_byte = mode.wire_code();
    let bw = brightness.to_wire();
    let sw = speed.to_wire();
    Frame::from_parts(mode_byte, bw, sw, checksum(mode_byte, bw, sw))
}

/// Kodiert Modus + Helligkeit + Geschwindigkeit in einen Frame
///
/// Schlägt mit [`LedError::InvalidLevel`] fehl, wenn eine Stufe außerhalb
/// 1..=5 liegt. Es entsteht nie ein halber Frame.
///
/// ```
/// # use ledctl_core::{encode, Mode};
/// let frame = encode(Mode::Cycle, 3, 3).unwrap();
/// assert_eq!(frame.as_bytes(), &[0xFA, 0x03, 0x03, 0x03, 0x03]);
/// ```
pub fn encode(mode: Mode, brightness: u8, speed: u8) -> Result<Frame, LedError> {
    let brightness = Level::new(brightness)?;
    let speed = Level::new(speed)?;
    Ok(frame_for(mode, brightness, speed))
}

/// Wie [`encode`], aber mit rohem Mode-Byte
///
/// Prüfreihenfolge: Modus, dann Helligkeit, dann Geschwindigkeit.
pub fn encode_raw(mode_byte: u8, brightness: u8, speed: u8) -> Result<Frame, LedError> {
    let mode = Mode::try_from(mode_byte)?;
    encode(mode, brightness, speed)
}
