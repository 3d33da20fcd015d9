// Ausgabe-Formate für `setpattern list` und `setpattern status`
// Text für Menschen, JSON für Skripte

use std::fmt::Write as _;

use ledctl_core::patterns::PATTERNS;
use ledctl_core::{PatternDescriptor, ProcessRecord};
use rgb::RGB8;
use serde::Serialize;

use crate::error::Result;

/// Ein Registry-Eintrag, wie er nach außen gezeigt wird
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternInfo {
    pub name: &'static str,
    pub summary: &'static str,
    /// Akzeptierte Argumente laut Schema
    pub args: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<RGB8>,
}

impl From<&PatternDescriptor> for PatternInfo {
    fn from(p: &PatternDescriptor) -> Self {
        Self {
            name: p.name,
            summary: p.summary,
            args: p.schema.arg_names(),
            hue: p.hue,
        }
    }
}

/// Alle registrierten Patterns, nach Namen sortiert
pub fn list_patterns() -> Vec<PatternInfo> {
    PATTERNS.iter().map(PatternInfo::from).collect()
}

/// Farbe als `#rrggbb`
pub fn hue_hex(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Eine Zeile pro Pattern: `name  summary  [args]  #hue`
pub fn render_patterns(patterns: &[PatternInfo]) -> String {
    let width = patterns.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for p in patterns {
        let _ = write!(out, "{:<width$}  {}", p.name, p.summary);
        if !p.args.is_empty() {
            let _ = write!(out, "  [args: {}]", p.args.join(", "));
        }
        if let Some(hue) = p.hue {
            let _ = write!(out, "  {}", hue_hex(hue));
        }
        out.push('\n');
    }
    out
}

/// Laufende Schleifen als `pid  cmdline`
pub fn render_running(records: &[ProcessRecord]) -> String {
    if records.is_empty() {
        return String::from("no pattern loops running\n");
    }
    let mut out = String::new();
    for r in records {
        let _ = writeln!(out, "{:>7}  {}", r.pid, r.cmdline);
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
