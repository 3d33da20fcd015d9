// Fehler-Typ der Host-Crate
//
// Umgebungsfehler (Gerät, Rechte, Signale) kommen hier dazu; alle
// Eingabe- und Protokollfehler stammen aus `ledctl_core::LedError`.
// Die Ursache steht nur in `source()`, nicht in der Meldung selbst;
// `main` gibt die ganze Kette mit `{:#}` aus.

use ledctl_core::LedError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Kein Port angegeben und die Port-Suche fand nichts
    #[error("no serial device found (try plugging/replugging)")]
    DeviceNotFound,

    /// Das OS verweigert das Öffnen oder Konfigurieren des Ports
    #[error("failed to open {path}")]
    OpenFailed {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error(transparent)]
    Core(#[from] LedError),

    #[error("failed to install signal handlers")]
    Signal(#[source] std::io::Error),

    #[error("failed to start background pattern (log: {log})")]
    Spawn {
        log: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode listing")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
