// Port-Suche für die USB-Serial Bridge

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::config::{BY_PATH_SUFFIX, SERIAL_BY_PATH_DIR, TTY_PREFIXES};

/// Kandidaten in Prioritäts-Reihenfolge
///
/// 1. `/dev/serial/by-path/*-if00-port0` (stabil über Replugs)
/// 2. `/dev/ttyUSB*`
/// 3. `/dev/ttyACM*`
///
/// Es wird nur die erste nicht-leere Gruppe geliefert, jeweils sortiert.
pub fn find_ports() -> Vec<String> {
    let by_path = by_path_ports(Path::new(SERIAL_BY_PATH_DIR));
    if !by_path.is_empty() {
        return by_path;
    }

    let names = match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!("Transport: port enumeration failed: {}", e);
            Vec::new()
        }
    };
    prioritize(names, TTY_PREFIXES)
}

/// Einträge in `dir`, deren Name auf BY_PATH_SUFFIX endet
fn by_path_ports(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        debug!("Transport: {} not present", dir.display());
        return Vec::new();
    };
    let mut found: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(BY_PATH_SUFFIX))
        .map(|entry| entry.path().to_string_lossy().into_owned())
        .collect();
    found.sort();
    found
}

/// Erste Präfix-Gruppe mit Treffern, sortiert
pub fn prioritize(names: Vec<String>, prefixes: &[&str]) -> Vec<String> {
    for prefix in prefixes {
        let mut group: Vec<String> = names
            .iter()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect();
        if !group.is_empty() {
            group.sort();
            return group;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_usb_before_acm() {
        let names = owned(&["/dev/ttyACM0", "/dev/ttyUSB1", "/dev/ttyS0", "/dev/ttyUSB0"]);
        assert_eq!(
            prioritize(names, TTY_PREFIXES),
            ["/dev/ttyUSB0", "/dev/ttyUSB1"]
        );
    }

    #[test]
    fn test_acm_fallback() {
        let names = owned(&["/dev/ttyS0", "/dev/ttyACM0"]);
        assert_eq!(prioritize(names, TTY_PREFIXES), ["/dev/ttyACM0"]);
    }

    #[test]
    fn test_nothing_found() {
        assert!(prioritize(owned(&["/dev/ttyS0"]), TTY_PREFIXES).is_empty());
    }

    #[test]
    fn test_missing_by_path_dir() {
        assert!(by_path_ports(Path::new("/nonexistent/serial/by-path")).is_empty());
    }
}
