/// Chart resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    /// 1 minute
    M1,
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 1 hour
    H1,
    /// 4 hours
    H4,
    /// 1 day
    Daily,
    /// 1 week
    Weekly,
}

/// Error parsing resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseResolutionError;

impl std::fmt::Display for ParseResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid resolution string")
    }
}

impl std::error::Error for ParseResolutionError {}

impl std::str::FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "M1" | "1" => Ok(Resolution::M1),
            "M5" | "5" => Ok(Resolution::M5),
            "M15" | "15" => Ok(Resolution::M15),
            "M30" | "30" => Ok(Resolution::M30),
            "H1" | "60" => Ok(Resolution::H1),
            "H4" | "240" => Ok(Resolution::H4),
            "D" | "1D" | "DAILY" => Ok(Resolution::Daily),
            "W" | "1W" | "WEEKLY" => Ok(Resolution::Weekly),
            _ => Err(ParseResolutionError),
        }
    }
}

impl Resolution {
    /// Returns duration in seconds
    #[must_use]
    pub fn to_seconds(&self) -> u64 {
        match self {
            Resolution::M1 => 60,
            Resolution::M5 => 300,
            Resolution::M15 => 900,
            Resolution::M30 => 1800,
            Resolution::H1 => 3600,
            Resolution::H4 => 14400,
            Resolution::Daily => 86400,
            Resolution::Weekly => 604_800,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::M1 => "M1",
            Resolution::M5 => "M5",
            Resolution::M15 => "M15",
            Resolution::M30 => "M30",
            Resolution::H1 => "H1",
            Resolution::H4 => "H4",
            Resolution::Daily => "D",
            Resolution::Weekly => "W",
        }
    }

    /// True for sub-daily resolutions.
    #[must_use]
    pub fn is_intraday(&self) -> bool {
        self.to_seconds() < Resolution::Daily.to_seconds()
    }

    /// True for the daily resolution.
    #[must_use]
    pub fn is_daily(&self) -> bool {
        matches!(self, Resolution::Daily)
    }

    /// True for the weekly resolution.
    #[must_use]
    pub fn is_weekly(&self) -> bool {
        matches!(self, Resolution::Weekly)
    }
}
