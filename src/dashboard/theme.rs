//! Color themes offered by the dashboard sidebar.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Blues,
    Cividis,
    Greens,
    Inferno,
    Magma,
    Plasma,
    Reds,
    Rainbow,
    Turbo,
    Viridis,
}

impl ColorTheme {
    /// Sidebar order.
    pub const ALL: [ColorTheme; 10] = [
        ColorTheme::Blues,
        ColorTheme::Cividis,
        ColorTheme::Greens,
        ColorTheme::Inferno,
        ColorTheme::Magma,
        ColorTheme::Plasma,
        ColorTheme::Reds,
        ColorTheme::Rainbow,
        ColorTheme::Turbo,
        ColorTheme::Viridis,
    ];

    /// Scheme name understood by charting libraries.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorTheme::Blues => "blues",
            ColorTheme::Cividis => "cividis",
            ColorTheme::Greens => "greens",
            ColorTheme::Inferno => "inferno",
            ColorTheme::Magma => "magma",
            ColorTheme::Plasma => "plasma",
            ColorTheme::Reds => "reds",
            ColorTheme::Rainbow => "rainbow",
            ColorTheme::Turbo => "turbo",
            ColorTheme::Viridis => "viridis",
        }
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == wanted)
            .ok_or_else(|| format!("unknown color theme '{s}'"))
    }
}
