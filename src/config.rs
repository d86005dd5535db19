//! Export settings that are not plain numbers. The flags themselves, and the
//! `ADFORGE_*` environment variables behind them, are declared in `main.rs`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use export::fonts::{FontProvider, GoogleFonts, NoFonts};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid font mode `{0}`: expected `google` or `none`")]
    InvalidFonts(String),
}

/// Where web fonts used by the scene are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontsMode {
    #[default]
    Google,
    None,
}

impl FromStr for FontsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "none" | "off" => Ok(Self::None),
            _ => Err(ConfigError::InvalidFonts(s.to_owned())),
        }
    }
}

impl FontsMode {
    #[must_use]
    pub fn provider(self) -> &'static dyn FontProvider {
        match self {
            Self::Google => &GoogleFonts,
            Self::None => &NoFonts,
        }
    }
}
