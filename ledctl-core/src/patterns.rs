//! Pattern-Registry
//!
//! Jedes Pattern deklariert sein Parameter-Schema explizit. Die äußere
//! Schicht (CLI) baut daraus ihre Argumente und die `list`-Ausgabe.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use rgb::RGB8;

use crate::error::LedError;
use crate::logic::frame_for;
use crate::types::{Frame, Level, LineConfig, Mode};

// ============================================================================
// Schema & Parameter
// ============================================================================

/// Welche Parameter ein Pattern akzeptiert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamSchema {
    /// `-b/--brightness` 1..=5
    pub brightness: bool,
    /// `-s/--speed` als Preset-Wahl 1..=4
    pub speed_preset: bool,
    /// `--mode-num` rohes Mode-Byte
    pub mode_override: bool,
    /// `--period` Tick-Länge in Sekunden
    pub tick_override: bool,
}

impl ParamSchema {
    /// Argument-Namen für die Listen-Ausgabe
    pub fn arg_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.brightness {
            names.push("brightness");
        }
        if self.speed_preset {
            names.push("speed");
        }
        if self.tick_override {
            names.push("period");
        }
        if self.mode_override {
            names.push("mode_num");
        }
        names
    }
}

/// Vom Aufrufer gesetzte Pattern-Parameter (alle optional)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternParams {
    pub brightness: Option<u8>,
    pub speed: Option<u8>,
    pub mode_override: Option<u8>,
    pub tick_override: Option<Duration>,
}

/// Aufgelöste Parameter einer laufenden Pattern-Schleife
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternPlan {
    pub mode: Mode,
    pub brightness: Level,
    pub speed: Level,
    pub tick: Duration,
    pub inter_byte_delay: Duration,
}

impl PatternPlan {
    /// Frame für den nächsten Tick (pro Sendevorgang neu gebaut)
    pub fn frame(&self) -> Frame {
        frame_for(self.mode, self.brightness, self.speed)
    }
}

// ============================================================================
// Breathing-Presets
// ============================================================================

/// Empirisch gemessenes Preset, das den internen Breathing-Zyklus auf Rot koppelt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingPreset {
    pub selector: u8,
    pub speed: Level,
    pub brightness: Level,
    pub tick: Duration,
}

const fn preset(selector: u8, speed: u8, brightness: u8, tick_ms: u64) -> BreathingPreset {
    BreathingPreset {
        selector,
        speed: Level::from_const(speed),
        brightness: Level::from_const(brightness),
        tick: Duration::from_millis(tick_ms),
    }
}

/// Selector → (Geräte-Speed, Helligkeit, Periode)
pub const BREATHING_PRESETS: [BreathingPreset; 4] = [
    preset(1, 1, 4, 5000),
    preset(2, 2, 3, 4000),
    preset(3, 3, 2, 3000),
    preset(4, 4, 1, 1800),
];

/// Prüft eine Preset-Tabelle
///
/// Selektoren müssen lückenlos bei 1 beginnen, Ticks positiv sein und mit
/// steigendem Selector strikt kürzer werden (schneller ⇒ kürzer).
pub fn validate_presets(presets: &[BreathingPreset]) -> Result<(), LedError> {
    if presets.is_empty() {
        return Err(LedError::InvalidPresetTable("table is empty"));
    }
    for (i, p) in presets.iter().enumerate() {
        if usize::from(p.selector) != i + 1 {
            return Err(LedError::InvalidPresetTable("selectors must be 1..n in order"));
        }
        if p.tick.is_zero() {
            return Err(LedError::InvalidPresetTable("tick must be positive"));
        }
    }
    if presets.windows(2).any(|w| w[1].tick >= w[0].tick) {
        return Err(LedError::InvalidPresetTable(
            "ticks must strictly decrease as the selector increases",
        ));
    }
    Ok(())
}

/// Sucht das Preset für einen Selector 1..=4
pub fn breathing_preset(selector: u8) -> Result<&'static BreathingPreset, LedError> {
    validate_presets(&BREATHING_PRESETS)?;
    BREATHING_PRESETS
        .iter()
        .find(|p| p.selector == selector)
        .ok_or(LedError::InvalidPreset(selector))
}

// ============================================================================
// Registry
// ============================================================================

/// Tick der Solid-Color Patterns (50 Hz)
pub const SOLID_TICK: Duration = Duration::from_millis(20);
/// Byte-Pause der Solid-Color Patterns
pub const SOLID_INTER_BYTE_DELAY: Duration = Duration::from_millis(1);
/// Tick des Alarm-Patterns
pub const ALARM_TICK: Duration = Duration::from_millis(650);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    /// Setzt einen animierten Modus ständig zurück, bevor er die erste Farbe verlässt
    SolidColor { default_mode: Mode },
    /// Startet Breathing im Preset-Takt neu, um die Phase festzuhalten
    BreathingLock,
    /// Maximale Helligkeit/Speed, fester Takt
    Alarm,
}

/// Eintrag der Registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternDescriptor {
    pub name: &'static str,
    pub summary: &'static str,
    pub schema: ParamSchema,
    /// Farbe, die das Pattern erzeugen soll (`None` = Geräte-Palette)
    pub hue: Option<RGB8>,
    kind: PatternKind,
}

const SOLID_SCHEMA: ParamSchema = ParamSchema {
    brightness: true,
    speed_preset: false,
    mode_override: true,
    tick_override: false,
};

/// Alle Patterns, nach Namen sortiert
pub static PATTERNS: &[PatternDescriptor] = &[
    PatternDescriptor {
        name: "alarm",
        summary: "aggressive blink meant to draw attention, no adjustable arguments",
        schema: ParamSchema {
            brightness: false,
            speed_preset: false,
            mode_override: true,
            tick_override: false,
        },
        hue: None,
        kind: PatternKind::Alarm,
    },
    PatternDescriptor {
        name: "breathered",
        summary: "red-only breathing, -s 1..4 selects a measured preset",
        schema: ParamSchema {
            brightness: false,
            speed_preset: true,
            mode_override: true,
            tick_override: true,
        },
        hue: Some(RGB8 { r: 255, g: 0, b: 0 }),
        kind: PatternKind::BreathingLock,
    },
    PatternDescriptor {
        name: "stillblue",
        summary: "solid blue by resetting RAINBOW at 50 Hz",
        schema: SOLID_SCHEMA,
        hue: Some(RGB8 { r: 0, g: 0, b: 255 }),
        kind: PatternKind::SolidColor {
            default_mode: Mode::Rainbow,
        },
    },
    PatternDescriptor {
        name: "stillred",
        summary: "solid red by resetting CYCLE at 50 Hz",
        schema: SOLID_SCHEMA,
        hue: Some(RGB8 { r: 255, g: 0, b: 0 }),
        kind: PatternKind::SolidColor {
            default_mode: Mode::Cycle,
        },
    },
];

/// Sucht ein Pattern anhand des Namens
pub fn lookup(name: &str) -> Result<&'static PatternDescriptor, LedError> {
    PATTERNS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| LedError::UnknownPattern(String::from(name)))
}

/// Alle registrierten Namen (sortiert)
pub fn names() -> impl Iterator<Item = &'static str> {
    PATTERNS.iter().map(|p| p.name)
}

impl PatternDescriptor {
    /// Löst Parameter + Leitungs-Konfiguration in einen Plan auf
    ///
    /// Parameter, die das Schema nicht kennt, werden abgelehnt statt
    /// stillschweigend ignoriert.
    pub fn plan(&self, params: &PatternParams, line: &LineConfig) -> Result<PatternPlan, LedError> {
        self.check_schema(params)?;

        let mode = match params.mode_override {
            Some(code) => Some(Mode::try_from(code)?),
            None => None,
        };
        if let Some(tick) = params.tick_override {
            if tick.is_zero() {
                return Err(LedError::InvalidParameter("period must be positive"));
            }
        }
        let paced = |own: Duration| {
            if line.delay_explicit {
                line.inter_byte_delay
            } else {
                own
            }
        };

        match self.kind {
            PatternKind::SolidColor { default_mode } => Ok(PatternPlan {
                mode: mode.unwrap_or(default_mode),
                brightness: Level::new(params.brightness.unwrap_or(1))?,
                speed: Level::MIN,
                tick: SOLID_TICK,
                inter_byte_delay: paced(SOLID_INTER_BYTE_DELAY),
            }),
            PatternKind::BreathingLock => {
                let preset = breathing_preset(params.speed.unwrap_or(1))?;
                Ok(PatternPlan {
                    mode: mode.unwrap_or(Mode::Breathing),
                    brightness: preset.brightness,
                    speed: preset.speed,
                    tick: params.tick_override.unwrap_or(preset.tick),
                    inter_byte_delay: line.inter_byte_delay,
                })
            }
            PatternKind::Alarm => Ok(PatternPlan {
                mode: mode.unwrap_or(Mode::Cycle),
                brightness: Level::MAX,
                speed: Level::MAX,
                tick: ALARM_TICK,
                inter_byte_delay: paced(crate::types::INTER_BYTE_DELAY_DEFAULT),
            }),
        }
    }

    fn check_schema(&self, params: &PatternParams) -> Result<(), LedError> {
        let s = &self.schema;
        if params.brightness.is_some() && !s.brightness {
            return Err(LedError::InvalidParameter("brightness is not accepted by this pattern"));
        }
        if params.speed.is_some() && !s.speed_preset {
            return Err(LedError::InvalidParameter("speed is not accepted by this pattern"));
        }
        if params.mode_override.is_some() && !s.mode_override {
            return Err(LedError::InvalidParameter("mode_num is not accepted by this pattern"));
        }
        if params.tick_override.is_some() && !s.tick_override {
            return Err(LedError::InvalidParameter("period is not accepted by this pattern"));
        }
        Ok(())
    }
}
