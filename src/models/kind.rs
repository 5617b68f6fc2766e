use serde::{Deserialize, Serialize};

/// Classification of the data being requested.
///
/// Providers interpret the kind themselves: the broker gateway serves all
/// five, the local cache only the categories it has files for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// News articles grouped by publication date
    News,
    /// Daily OHLCV bars
    Historical,
    /// Fundamental report snapshots
    Fundamentals,
    /// Contract/company metadata
    CompanyInfo,
    /// Real-time market snapshot
    RealTime,
}

impl DataKind {
    /// The wire/config name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::News => "news",
            DataKind::Historical => "historical",
            DataKind::Fundamentals => "fundamentals",
            DataKind::CompanyInfo => "company_info",
            DataKind::RealTime => "real_time",
        }
    }

    /// Parse a kind name. Returns `None` for unrecognized names; callers at
    /// the outer boundary treat that as "warn and return empty", never as a
    /// hard error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "news" => Some(DataKind::News),
            "historical" => Some(DataKind::Historical),
            "fundamentals" => Some(DataKind::Fundamentals),
            "company_info" => Some(DataKind::CompanyInfo),
            "real_time" => Some(DataKind::RealTime),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            DataKind::News,
            DataKind::Historical,
            DataKind::Fundamentals,
            DataKind::CompanyInfo,
            DataKind::RealTime,
        ] {
            assert_eq!(DataKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(DataKind::parse("NEWS"), Some(DataKind::News));
        assert_eq!(DataKind::parse("Company_Info"), Some(DataKind::CompanyInfo));
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert_eq!(DataKind::parse("sentiment"), None);
        assert_eq!(DataKind::parse(""), None);
    }
}
