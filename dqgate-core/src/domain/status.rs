// dqgate-core/src/domain/status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// Declaration order gives Pass < Warn < Fail, so the derived Ord is the
// severity order and "worst of N" is a plain max().

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    #[default]
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// Worst status of a sequence. An empty sequence is `Pass`.
    pub fn worst<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = CheckStatus>,
    {
        statuses.into_iter().max().unwrap_or(CheckStatus::Pass)
    }

    /// Raise `self` to at least `floor`, never lowering it.
    pub fn at_least(self, floor: CheckStatus) -> Self {
        self.max(floor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Warn => "⚠️",
            Self::Fail => "❌",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PASS" => Ok(Self::Pass),
            "WARN" => Ok(Self::Warn),
            "FAIL" => Ok(Self::Fail),
            _ => Err(format!("Unknown check status: {}", s)),
        }
    }
}
