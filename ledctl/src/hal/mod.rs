// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus ledctl-core für Linux:
// serielle Leitung, Uhr, Prozesstabelle und Signale.

pub mod clock;
pub mod ports;
pub mod process;
pub mod serial;
pub mod signals;

pub use clock::MonotonicClock;
pub use ports::find_ports;
pub use process::{NixSignaller, PsProcessLister, parse_ps_output};
pub use serial::{SerialConnection, send_and_close, send_one_shot, write_paced};
pub use signals::shutdown_flag;
