//! Target architecture types.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// CPU architecture forwarded to UAT as `-architecture=`.
///
/// Optional: when unset UAT picks the platform default.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetArch {
    /// x86_64 / AMD64
    X64,
    /// AArch64 / ARM64
    Arm64,
}

impl TargetArch {
    /// Architecture name as UAT spells it.
    pub fn as_uat_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_uat_str())
    }
}

impl FromStr for TargetArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Self::X64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            other => Err(format!("unknown architecture `{other}` (expected x64 or arm64)")),
        }
    }
}

impl TryFrom<String> for TargetArch {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetArch> for String {
    fn from(arch: TargetArch) -> Self {
        arch.as_uat_str().to_string()
    }
}
