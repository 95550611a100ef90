use std::fmt;
use std::str::FromStr;

use crate::foundation::error::AdeqError;

/// Page color theme; each theme has its own background music.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (also accepted as `bright`).
    #[default]
    #[serde(alias = "bright")]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Name used in asset paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AdeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "bright" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(AdeqError::validation(format!(
                "unknown theme '{other}' (expected light or dark)"
            ))),
        }
    }
}
