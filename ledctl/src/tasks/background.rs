// Hintergrund-Modus: Schleife als losgelöster Prozess

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use log::info;

use crate::config::background_log_path;
use crate::error::{Error, Result};

const BACKGROUND_FLAGS: &[&str] = &["--background", "-g"];
const NO_KILL_FLAG: &str = "--no-kill-existing";

/// Argumente für den Kind-Prozess
///
/// `--background`/`-g` fällt weg (sonst endlose Re-Execs), `--no-kill-existing`
/// kommt dazu (sonst beendet das Kind seinen eigenen Eltern-Aufruf).
pub fn child_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = args
        .into_iter()
        .filter(|a| !BACKGROUND_FLAGS.contains(&a.as_str()))
        .collect();
    if !out.iter().any(|a| a == NO_KILL_FLAG) {
        out.push(NO_KILL_FLAG.to_string());
    }
    out
}

/// Startet das eigene Binary mit `child_args` in neuer Prozessgruppe
///
/// stdin ist /dev/null, stdout/stderr landen in `/tmp/ledctl-<pattern>.log`.
/// Liefert die PID des Kindes.
pub fn spawn_background(pattern: &str, child_args: Vec<String>) -> Result<u32> {
    let log_path = background_log_path(pattern);
    let spawn_failed = |source: io::Error| Error::Spawn {
        log: log_path.display().to_string(),
        source,
    };

    let exe = env::current_exe().map_err(spawn_failed)?;
    let stdout = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(spawn_failed)?;
    let stderr = stdout.try_clone().map_err(spawn_failed)?;

    let child = Command::new(exe)
        .args(&child_args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .process_group(0)
        .spawn()
        .map_err(spawn_failed)?;

    info!(
        "Pattern: {} running in background (pid {}, log {})",
        pattern,
        child.id(),
        log_path.display()
    );
    Ok(child.id())
}
