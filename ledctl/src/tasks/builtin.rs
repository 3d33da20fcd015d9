// Built-in Modi: ein einzelner Frame, keine Wiederholung

use ledctl_core::{Frame, LineConfig, Mode, encode};
use log::info;

use crate::error::Result;
use crate::hal::send_one_shot;

/// One-shot: Port öffnen, Frame senden, Port schließen
///
/// Die Level werden geprüft, bevor der Port überhaupt geöffnet wird.
pub fn send_builtin(mode: Mode, brightness: u8, speed: u8, line: &LineConfig) -> Result<Frame> {
    let frame = encode(mode, brightness, speed)?;
    send_one_shot(line, &frame)?;
    info!("Builtin: {} b={} s={}", mode, brightness, speed);
    Ok(frame)
}
