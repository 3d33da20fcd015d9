// Kommandozeile (clap derive) und Dispatch auf die Tasks

use std::env;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use ledctl_core::patterns::lookup;
use ledctl_core::{LineConfig, Mode, PatternParams, encode};
use log::info;

use crate::config::EnvOverrides;
use crate::error::Result;
use crate::hal::find_ports;
use crate::listing::{list_patterns, render_patterns, render_running, to_json};
use crate::tasks::{
    child_args, kill_all_patterns, run_pattern, running_patterns, send_builtin, spawn_background,
};

#[derive(Debug, Parser)]
#[command(name = "ledctl", version, about = "Control a serial RGB LED controller")]
pub struct Cli {
    /// Mehr Log-Ausgabe (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a built-in mode once
    Setmode(SetModeArgs),
    /// Turn the LEDs off
    Off(OffArgs),
    /// Run a pattern loop, or list/kill/status
    Setpattern(SetPatternArgs),
    /// List candidate serial ports
    Ports,
}

// ============================================================================
// Serielle Leitung
// ============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct SerialArgs {
    /// Serial device (default: auto-detect)
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    #[arg(short = 'B', long)]
    pub baud: Option<u32>,

    /// Assert DTR
    #[arg(short = 't', long, overrides_with = "no_dtr")]
    pub dtr: bool,

    /// Deassert DTR
    #[arg(short = 'T', long, overrides_with = "dtr")]
    pub no_dtr: bool,

    /// Assert RTS
    #[arg(short = 'r', long, overrides_with = "no_rts")]
    pub rts: bool,

    /// Deassert RTS
    #[arg(short = 'R', long, overrides_with = "rts")]
    pub no_rts: bool,

    /// Pause between frame bytes
    #[arg(short = 'd', long, value_name = "SECS", value_parser = parse_seconds)]
    pub delay: Option<Duration>,
}

impl SerialArgs {
    /// Default → Umgebung → CLI-Flags
    pub fn line_config(&self, env: &EnvOverrides) -> LineConfig {
        let mut line = env.apply(LineConfig::default());
        if let Some(port) = &self.port {
            line.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            line.baud = baud;
        }
        if let Some(delay) = self.delay {
            line = line.with_inter_byte_delay(delay);
        }
        if let Some(dtr) = flag_pair(self.dtr, self.no_dtr) {
            line.dtr = dtr;
        }
        if let Some(rts) = flag_pair(self.rts, self.no_rts) {
            line.rts = rts;
        }
        line
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

// ============================================================================
// Subcommands
// ============================================================================

#[derive(Debug, Args)]
pub struct SetModeArgs {
    /// rainbow, breathing, cycle, off or auto
    #[arg(value_parser = parse_mode)]
    pub mode: Mode,

    /// Brightness 1..5
    #[arg(short = 'b', long, default_value_t = 1)]
    pub brightness: u8,

    /// Speed 1..5
    #[arg(short = 's', long, default_value_t = 1)]
    pub speed: u8,

    /// Leave running pattern loops alone
    #[arg(long)]
    pub no_kill_existing: bool,

    #[command(flatten)]
    pub serial: SerialArgs,
}

#[derive(Debug, Args)]
pub struct OffArgs {
    /// Leave running pattern loops alone
    #[arg(long)]
    pub no_kill_existing: bool,

    #[command(flatten)]
    pub serial: SerialArgs,
}

#[derive(Debug, Args)]
pub struct SetPatternArgs {
    /// Pattern name, or one of: list, kill, status (default: list)
    pub target: Option<String>,

    /// JSON output for list/status
    #[arg(long)]
    pub json: bool,

    /// Brightness 1..5
    #[arg(short = 'b', long)]
    pub brightness: Option<u8>,

    /// Speed preset
    #[arg(short = 's', long)]
    pub speed: Option<u8>,

    /// Override the resend period
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub period: Option<Duration>,

    /// Raw mode byte, e.g. 0x03
    #[arg(long, value_parser = parse_byte)]
    pub mode_num: Option<u8>,

    /// Detach and keep running after the shell exits
    #[arg(short = 'g', long)]
    pub background: bool,

    /// Leave running pattern loops alone
    #[arg(long)]
    pub no_kill_existing: bool,

    #[command(flatten)]
    pub serial: SerialArgs,
}

/// Was `setpattern <target>` bedeutet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTarget<'a> {
    List,
    Kill,
    Status,
    Run(&'a str),
}

impl<'a> From<Option<&'a str>> for PatternTarget<'a> {
    fn from(target: Option<&'a str>) -> Self {
        match target {
            None | Some("list") => PatternTarget::List,
            Some("kill") => PatternTarget::Kill,
            Some("status") => PatternTarget::Status,
            Some(name) => PatternTarget::Run(name),
        }
    }
}

impl SetPatternArgs {
    pub fn params(&self) -> PatternParams {
        PatternParams {
            brightness: self.brightness,
            speed: self.speed,
            mode_override: self.mode_num,
            tick_override: self.period,
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

fn parse_mode(value: &str) -> std::result::Result<Mode, String> {
    Mode::from_name(value).map_err(|e| e.to_string())
}

/// Dezimal oder hex (`0x03`)
fn parse_byte(value: &str) -> std::result::Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("not a byte value: {value}"))
}

/// Sekunden als Kommazahl (`0.005`)
fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("not a number of seconds: {value}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid duration: {value}"))
}

// ============================================================================
// Dispatch
// ============================================================================

impl Cli {
    /// Führt das gewählte Kommando aus
    pub fn execute(self) -> Result<()> {
        let env = EnvOverrides::from_env();
        match self.command {
            Command::Setmode(args) => {
                encode(args.mode, args.brightness, args.speed)?;
                clear_running(args.no_kill_existing);
                send_builtin(args.mode, args.brightness, args.speed, &args.serial.line_config(&env))?;
            }
            Command::Off(args) => {
                clear_running(args.no_kill_existing);
                send_builtin(Mode::Off, 1, 1, &args.serial.line_config(&env))?;
            }
            Command::Setpattern(args) => setpattern(&args, &env)?,
            Command::Ports => {
                let ports = find_ports();
                if ports.is_empty() {
                    println!("no serial ports found");
                }
                for port in ports {
                    println!("{port}");
                }
            }
        }
        Ok(())
    }
}

fn setpattern(args: &SetPatternArgs, env: &EnvOverrides) -> Result<()> {
    match PatternTarget::from(args.target.as_deref()) {
        PatternTarget::List => {
            let patterns = list_patterns();
            if args.json {
                println!("{}", to_json(&patterns)?);
            } else {
                print!("{}", render_patterns(&patterns));
            }
        }
        PatternTarget::Kill => {
            let count = kill_all_patterns();
            println!("stopped {count} pattern loop(s)");
        }
        PatternTarget::Status => {
            let running = running_patterns();
            if args.json {
                println!("{}", to_json(&running)?);
            } else {
                print!("{}", render_running(&running));
            }
        }
        PatternTarget::Run(name) => {
            let params = args.params();
            let line = args.serial.line_config(env);

            if args.background {
                // Ungültige Eingaben dürfen laufende Schleifen nicht beenden
                lookup(name)?.plan(&params, &line)?;
                clear_running(args.no_kill_existing);
                let pid = spawn_background(name, child_args(env::args().skip(1)))?;
                println!("{name} started in background (pid {pid})");
            } else {
                run_pattern(name, &params, &line, !args.no_kill_existing)?;
            }
        }
    }
    Ok(())
}

fn clear_running(skip: bool) {
    if skip {
        return;
    }
    let stopped = kill_all_patterns();
    if stopped > 0 {
        info!("Guard: cleared {} running pattern loop(s)", stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LOOP_SIGNATURE;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_setmode() {
        let cli = Cli::try_parse_from(["ledctl", "setmode", "cycle", "-b", "3", "-s", "2"]).unwrap();
        let Command::Setmode(args) = cli.command else {
            panic!("expected setmode");
        };
        assert_eq!(args.mode, Mode::Cycle);
        assert_eq!((args.brightness, args.speed), (3, 2));
        assert!(!args.no_kill_existing);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["ledctl", "setmode", "disco"]).is_err());
    }

    #[test]
    fn test_parse_setpattern_flags() {
        let cli = Cli::try_parse_from([
            "ledctl", "-v", "setpattern", "breathered", "-s", "3", "--period", "2.5",
            "--mode-num", "0x02", "-g", "-p", "/dev/ttyUSB0", "-d", "0.002", "-T",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Setpattern(args) = cli.command else {
            panic!("expected setpattern");
        };
        assert_eq!(PatternTarget::from(args.target.as_deref()), PatternTarget::Run("breathered"));
        assert!(args.background);
        assert_eq!(
            args.params(),
            PatternParams {
                brightness: None,
                speed: Some(3),
                mode_override: Some(2),
                tick_override: Some(Duration::from_millis(2500)),
            }
        );

        let line = args.serial.line_config(&EnvOverrides::default());
        assert_eq!(line.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(line.inter_byte_delay, Duration::from_millis(2));
        assert!(line.delay_explicit);
        assert!(!line.dtr);
    }

    #[test]
    fn test_admin_targets() {
        assert_eq!(PatternTarget::from(Some("list")), PatternTarget::List);
        assert_eq!(PatternTarget::from(Some("kill")), PatternTarget::Kill);
        assert_eq!(PatternTarget::from(Some("status")), PatternTarget::Status);
    }

    #[test]
    fn test_bare_setpattern_lists() {
        let cli = Cli::try_parse_from(["ledctl", "setpattern"]).unwrap();
        let Command::Setpattern(args) = cli.command else {
            panic!("expected setpattern");
        };
        assert_eq!(args.target, None);
        assert_eq!(PatternTarget::from(args.target.as_deref()), PatternTarget::List);

        let cli = Cli::try_parse_from(["ledctl", "setpattern", "--json"]).unwrap();
        let Command::Setpattern(args) = cli.command else {
            panic!("expected setpattern");
        };
        assert!(args.json);
        assert_eq!(PatternTarget::from(args.target.as_deref()), PatternTarget::List);
    }

    #[test]
    fn test_loop_signature_knows_every_value_flag() {
        let cmd = Cli::command();
        let setpattern = cmd.find_subcommand("setpattern").unwrap();
        let value_flags = LOOP_SIGNATURE.value_flags;

        for arg in setpattern.get_arguments() {
            if arg.is_positional() || !arg.get_action().takes_values() {
                continue;
            }
            if let Some(short) = arg.get_short() {
                assert!(value_flags.contains(&format!("-{short}").as_str()), "-{short}");
            }
            if let Some(long) = arg.get_long() {
                assert!(value_flags.contains(&format!("--{long}").as_str()), "--{long}");
            }
        }
    }

    #[test]
    fn test_cli_flag_beats_environment() {
        let env = EnvOverrides {
            port: Some("/dev/ttyACM0".into()),
            baud: Some(9600),
            dtr: Some(false),
            ..Default::default()
        };
        let serial = SerialArgs {
            port: Some("/dev/ttyUSB2".into()),
            dtr: true,
            ..Default::default()
        };
        let line = serial.line_config(&env);
        assert_eq!(line.port.as_deref(), Some("/dev/ttyUSB2"));
        assert_eq!(line.baud, 9600);
        assert!(line.dtr);
        assert!(!line.delay_explicit);
    }

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("0x05"), Ok(5));
        assert_eq!(parse_byte("3"), Ok(3));
        assert!(parse_byte("0x100").is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("0.5"), Ok(Duration::from_millis(500)));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }
}
