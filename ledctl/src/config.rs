// Projekt-Konfiguration: Konstanten und Laufzeit-Overrides

use std::path::PathBuf;
use std::time::Duration;

use ledctl_core::{LineConfig, LoopSignature};
use log::{debug, warn};

// ============================================================================
// Prozess-Erkennung
// ============================================================================

/// Programmname, an dem der Guard laufende Schleifen erkennt
/// Muss mit `[[bin]] name` in Cargo.toml übereinstimmen
pub const PROGRAM_NAME: &str = "ledctl";

/// Subcommand, das eine Pattern-Schleife startet
pub const PATTERN_SUBCOMMAND: &str = "setpattern";

/// Admin-Aufrufe von `setpattern`, die nie als Schleife zählen
pub const ADMIN_SUBCOMMANDS: &[&str] = &["list", "kill", "status"];

/// Signatur, nach der der Guard in der Prozesstabelle sucht
pub const LOOP_SIGNATURE: LoopSignature = LoopSignature {
    program: PROGRAM_NAME,
    subcommand: PATTERN_SUBCOMMAND,
    admin_args: ADMIN_SUBCOMMANDS,
    value_flags: LoopSignature::DEFAULT.value_flags,
};

/// Wartezeit zwischen SIGTERM und SIGKILL
pub const GUARD_GRACE: Duration = Duration::from_millis(800);

// ============================================================================
// Scheduler / Abbruch
// ============================================================================

/// Maximale Schlafdauer am Stück, bevor das Abbruch-Flag geprüft wird
/// Muss deutlich unter GUARD_GRACE liegen, sonst endet jede Schleife per SIGKILL
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

// ============================================================================
// Port-Suche
// ============================================================================

/// Stabile Pfade der USB-Serial Bridges (bevorzugt)
pub const SERIAL_BY_PATH_DIR: &str = "/dev/serial/by-path";

/// Suffix des ersten Interfaces einer CH340 Bridge
pub const BY_PATH_SUFFIX: &str = "-if00-port0";

/// Fallback-Präfixe in Prioritäts-Reihenfolge
pub const TTY_PREFIXES: &[&str] = &["/dev/ttyUSB", "/dev/ttyACM"];

// ============================================================================
// Hintergrund-Modus
// ============================================================================

/// Verzeichnis für Logs der Hintergrund-Schleifen
pub const BACKGROUND_LOG_DIR: &str = "/tmp";

/// Log-Datei einer Hintergrund-Schleife: /tmp/ledctl-<pattern>.log
pub fn background_log_path(pattern: &str) -> PathBuf {
    PathBuf::from(BACKGROUND_LOG_DIR).join(format!("{PROGRAM_NAME}-{pattern}.log"))
}

// ============================================================================
// Umgebungs-Overrides
// ============================================================================

pub const ENV_PORT: &str = "LEDCTL_PORT";
pub const ENV_BAUD: &str = "LEDCTL_BAUD";
pub const ENV_DELAY_MS: &str = "LEDCTL_DELAY_MS";
pub const ENV_DTR: &str = "LEDCTL_DTR";
pub const ENV_RTS: &str = "LEDCTL_RTS";

/// Leitungs-Einstellungen aus der Umgebung (bzw. `.env`)
///
/// Reihenfolge: CLI-Flag > Umgebung > Default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub delay: Option<Duration>,
    pub dtr: Option<bool>,
    pub rts: Option<bool>,
}

impl EnvOverrides {
    /// Lädt `.env` (falls vorhanden) und liest die LEDCTL_* Variablen
    pub fn from_env() -> Self {
        if let Some(e) = dotenv_problem(dotenvy::dotenv()) {
            warn!("Config: .env not loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Wie `from_env`, aber mit beliebiger Quelle (testbar)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup(ENV_PORT).filter(|p| !p.trim().is_empty()),
            baud: parse_var(&lookup, ENV_BAUD, |v| v.parse().ok()),
            delay: parse_var(&lookup, ENV_DELAY_MS, |v| {
                v.parse::<u64>().ok().map(Duration::from_millis)
            }),
            dtr: parse_var(&lookup, ENV_DTR, parse_bool),
            rts: parse_var(&lookup, ENV_RTS, parse_bool),
        }
    }

    /// Überträgt gesetzte Werte auf eine Leitungs-Konfiguration
    pub fn apply(&self, mut line: LineConfig) -> LineConfig {
        if let Some(port) = &self.port {
            line.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            line.baud = baud;
        }
        if let Some(delay) = self.delay {
            line = line.with_inter_byte_delay(delay);
        }
        if let Some(dtr) = self.dtr {
            line.dtr = dtr;
        }
        if let Some(rts) = self.rts {
            line.rts = rts;
        }
        line
    }
}

/// Fehler beim Laden von `.env`, die gemeldet werden müssen
///
/// Eine fehlende Datei ist der Normalfall und zählt nicht.
fn dotenv_problem(result: dotenvy::Result<PathBuf>) -> Option<dotenvy::Error> {
    match result {
        Ok(path) => {
            debug!("Config: loaded {}", path.display());
            None
        }
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!("Config: ignoring malformed {}={:?}", key, raw);
    }
    parsed
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_missing_dotenv_is_silent() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no .env");
        assert!(dotenv_problem(Err(dotenvy::Error::Io(missing))).is_none());
        assert!(dotenv_problem(Ok(PathBuf::from("/srv/ledctl/.env"))).is_none());
    }

    #[test]
    fn test_broken_dotenv_is_reported() {
        let parse = dotenvy::Error::LineParse("LEDCTL_BAUD 9600".into(), 11);
        assert!(matches!(
            dotenv_problem(Err(parse)),
            Some(dotenvy::Error::LineParse(_, 11))
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            dotenv_problem(Err(dotenvy::Error::Io(denied))),
            Some(dotenvy::Error::Io(_))
        ));
    }

    #[test]
    fn test_env_overrides_parsed() {
        let env = EnvOverrides::from_lookup(lookup(&[
            (ENV_PORT, "/dev/ttyUSB3"),
            (ENV_BAUD, "9600"),
            (ENV_DELAY_MS, "2"),
            (ENV_DTR, "off"),
            (ENV_RTS, "1"),
        ]));
        let line = env.apply(LineConfig::default());
        assert_eq!(line.port.as_deref(), Some("/dev/ttyUSB3"));
        assert_eq!(line.baud, 9600);
        assert_eq!(line.inter_byte_delay, Duration::from_millis(2));
        assert!(line.delay_explicit);
        assert!(!line.dtr);
        assert!(line.rts);
    }

    #[test]
    fn test_malformed_values_ignored() {
        let env = EnvOverrides::from_lookup(lookup(&[(ENV_BAUD, "fast"), (ENV_DTR, "maybe")]));
        assert_eq!(env, EnvOverrides::default());
    }

    #[test]
    fn test_background_log_path() {
        assert_eq!(
            background_log_path("alarm"),
            PathBuf::from("/tmp/ledctl-alarm.log")
        );
    }
}
