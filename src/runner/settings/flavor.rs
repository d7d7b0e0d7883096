//! Build flavor (UAT client configuration) types.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Build flavor passed to UAT as `-clientconfig`.
///
/// Each flavor also has a short tag used inside version tokens
/// (`042625_dev_001`).
///
/// # Examples
///
/// ```
/// use ue_build_orchestrator::runner::BuildFlavor;
///
/// let flavor: BuildFlavor = "debuggame".parse().unwrap();
/// assert_eq!(flavor, BuildFlavor::DebugGame);
/// assert_eq!(flavor.tag(), "debug");
/// assert_eq!(flavor.client_config(), "DebugGame");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildFlavor {
    /// `Development` - tagged `dev`
    #[default]
    Development,
    /// `DebugGame` - tagged `debug`
    DebugGame,
    /// `Shipping` - tagged `shipping`
    Shipping,
}

impl BuildFlavor {
    /// All flavors, in UAT's usual order.
    pub const ALL: [BuildFlavor; 3] = [Self::DebugGame, Self::Development, Self::Shipping];

    /// Short tag stored in version tokens.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::DebugGame => "debug",
            Self::Shipping => "shipping",
        }
    }

    /// Name UAT expects for `-clientconfig`.
    pub fn client_config(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::DebugGame => "DebugGame",
            Self::Shipping => "Shipping",
        }
    }
}

impl fmt::Display for BuildFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.client_config())
    }
}

impl FromStr for BuildFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "debug" | "debuggame" => Ok(Self::DebugGame),
            "shipping" => Ok(Self::Shipping),
            other => Err(format!(
                "unknown build config `{other}` (expected dev, debuggame or shipping)"
            )),
        }
    }
}

impl TryFrom<String> for BuildFlavor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildFlavor> for String {
    fn from(flavor: BuildFlavor) -> Self {
        flavor.client_config().to_string()
    }
}
