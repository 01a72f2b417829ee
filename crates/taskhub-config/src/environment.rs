use std::fmt;
use std::str::FromStr;

/// Deployment environment
///
/// Controls stack-trace exposure in error responses and the default
/// crash-report sample rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Whether debug details (stack traces, local request logs) are shown
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Crash-report sample rate when none is configured explicitly
    pub const fn default_sample_rate(self) -> f64 {
        match self {
            Self::Production => 1.0,
            Self::Development | Self::Test => 0.5,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => anyhow::bail!("unknown environment '{other}' (expected development, production, or test)"),
        }
    }
}
