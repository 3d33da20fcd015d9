// SIGINT/SIGTERM → Abbruch-Flag der Pattern-Schleife

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::debug;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::error::{Error, Result};

/// Registriert SIGINT und SIGTERM; beide setzen das gelieferte Flag
///
/// Der Handler selbst tut nichts weiter, die Schleife prüft das Flag
/// und schließt den Port.
pub fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag)).map_err(Error::Signal)?;
    }
    debug!("Pattern: stop handlers installed for SIGINT/SIGTERM");
    Ok(flag)
}
