// Serieller Transport zum LED-Controller
//
// Kapselt den Port hinter `FrameWriter`, damit Pattern-Schleifen mit
// Mock-Implementierungen getestet werden können.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use ledctl_core::{Frame, FrameWriter, LedError, LineConfig};
use log::{debug, error, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::error::{Error, Result};
use crate::hal::ports::find_ports;

/// Timeout für Port-Operationen; der Controller antwortet nie, also nur für write()
const PORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Schreibt einen Frame Byte für Byte: write → flush → Pause
///
/// Der UART-Empfänger der Firmware latcht Bytes ohne Abstand unzuverlässig,
/// daher NIE den ganzen Frame auf einmal schreiben.
///
/// # Fehlerbehandlung
/// Liefert den Index des fehlgeschlagenen Bytes. Ein halber Frame wird nicht
/// fortgesetzt.
pub fn write_paced<W: Write + ?Sized>(
    out: &mut W,
    frame: &Frame,
    delay: Duration,
) -> std::result::Result<(), (usize, io::Error)> {
    for (index, byte) in frame.as_bytes().iter().enumerate() {
        out.write_all(std::slice::from_ref(byte))
            .and_then(|()| out.flush())
            .map_err(|e| (index, e))?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(())
}

/// Löst den Gerätepfad auf: expliziter Pfad oder erster Kandidat der Suche
pub fn resolve_port(config: &LineConfig, discover: impl FnOnce() -> Vec<String>) -> Result<String> {
    match &config.port {
        Some(path) => Ok(path.clone()),
        None => {
            let candidates = discover();
            debug!("Transport: port candidates {:?}", candidates);
            candidates.into_iter().next().ok_or(Error::DeviceNotFound)
        }
    }
}

/// Offene Verbindung zum Controller
///
/// Kann für beliebig viele `send()` wiederverwendet werden. Der Port wird
/// bei `close()` oder spätestens beim Drop freigegeben.
pub struct SerialConnection {
    port: Option<Box<dyn SerialPort>>,
    path: String,
    inter_byte_delay: Duration,
}

impl SerialConnection {
    /// Öffnet den Port laut `config`, sucht ihn bei Bedarf über `find_ports()`
    pub fn open(config: &LineConfig) -> Result<Self> {
        Self::open_with(config, find_ports)
    }

    /// Wie `open`, aber mit eigener Port-Suche
    ///
    /// # Fehlerbehandlung
    /// - `Error::DeviceNotFound` wenn kein Pfad aufgelöst werden kann
    /// - `Error::OpenFailed` wenn das OS den Zugriff verweigert
    pub fn open_with(config: &LineConfig, discover: impl FnOnce() -> Vec<String>) -> Result<Self> {
        let path = resolve_port(config, discover)?;
        let open_failed = |source| Error::OpenFailed {
            path: path.clone(),
            source,
        };

        // 8N1, keine Flusskontrolle
        let mut port = serialport::new(&path, config.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(PORT_TIMEOUT)
            .open()
            .map_err(open_failed)?;

        // Manche Hardware-Revisionen hängen Strom/Logik an DTR/RTS
        port.write_data_terminal_ready(config.dtr)
            .map_err(open_failed)?;
        port.write_request_to_send(config.rts)
            .map_err(open_failed)?;

        info!(
            "Transport: opened {} @ {} baud (dtr={}, rts={}, delay={:?})",
            path, config.baud, config.dtr, config.rts, config.inter_byte_delay
        );

        Ok(Self {
            port: Some(port),
            path,
            inter_byte_delay: config.inter_byte_delay,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FrameWriter for SerialConnection {
    fn send(&mut self, frame: &Frame) -> std::result::Result<(), LedError> {
        let port = self.port.as_mut().ok_or(LedError::NotOpen)?;

        if let Err((byte_index, e)) = write_paced(port.as_mut(), frame, self.inter_byte_delay) {
            error!(
                "Transport: write to {} failed at byte {} of [{}]: {}",
                self.path, byte_index, frame, e
            );
            self.close();
            return Err(LedError::WriteFailed { byte_index });
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!("Transport: closed {}", self.path);
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sendet einen Frame und schließt den Writer, auch nach einem Fehler
pub fn send_and_close<W: FrameWriter>(
    writer: &mut W,
    frame: &Frame,
) -> std::result::Result<(), LedError> {
    let result = writer.send(frame);
    writer.close();
    result
}

/// Öffnen, einen Frame senden, schließen
///
/// Der Port wird auf jedem Weg wieder freigegeben (auch bei Fehlern).
pub fn send_one_shot(config: &LineConfig, frame: &Frame) -> Result<()> {
    let mut conn = SerialConnection::open(config)?;
    send_and_close(&mut conn, frame)?;
    info!("Transport: sent [{}] to {}", frame, conn.path());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ledctl_core::{Mode, encode};

    /// Schreibt in einen Vec und zählt flush()-Aufrufe
    #[derive(Default)]
    struct RecordingWriter {
        bytes: Vec<u8>,
        writes: usize,
        flushes: usize,
        fail_at: Option<usize>,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_at == Some(self.writes) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
            }
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_paced_one_byte_per_write() {
        let frame = encode(Mode::Cycle, 3, 3).unwrap();
        let mut out = RecordingWriter::default();

        write_paced(&mut out, &frame, Duration::ZERO).unwrap();

        assert_eq!(out.bytes, [0xFA, 0x03, 0x03, 0x03, 0x03]);
        assert_eq!(out.writes, 5);
        assert_eq!(out.flushes, 5);
    }

    #[test]
    fn test_write_paced_sleeps_between_bytes() {
        let frame = encode(Mode::Off, 1, 1).unwrap();
        let mut out = RecordingWriter::default();
        let start = std::time::Instant::now();

        write_paced(&mut out, &frame, Duration::from_millis(2)).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_write_paced_reports_failed_byte() {
        let frame = encode(Mode::Rainbow, 2, 2).unwrap();
        let mut out = RecordingWriter {
            fail_at: Some(2),
            ..Default::default()
        };

        let err = write_paced(&mut out, &frame, Duration::ZERO).unwrap_err();

        assert_eq!(err.0, 2);
        assert_eq!(out.bytes.len(), 2);
    }

    #[test]
    fn test_resolve_port_prefers_explicit_path() {
        let cfg = LineConfig::default().with_port("/dev/ttyUSB7");
        let path = resolve_port(&cfg, || vec!["/dev/ttyUSB0".into()]).unwrap();
        assert_eq!(path, "/dev/ttyUSB7");
    }

    #[test]
    fn test_resolve_port_uses_first_candidate() {
        let cfg = LineConfig::default();
        let path = resolve_port(&cfg, || vec!["/dev/ttyUSB1".into(), "/dev/ttyACM0".into()]).unwrap();
        assert_eq!(path, "/dev/ttyUSB1");
    }

    #[test]
    fn test_open_without_device_fails() {
        let cfg = LineConfig::default();
        let result = SerialConnection::open_with(&cfg, Vec::new);
        assert!(matches!(result, Err(Error::DeviceNotFound)));
    }
}
