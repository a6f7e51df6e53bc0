use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Speed/cost level requested for an archive retrieval job.
///
/// `Expedited` finishes in minutes but is billed at a steep premium, `Bulk`
/// takes hours and is the cheapest option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RestoreTier {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "Bulk"))]
    Bulk,
    #[cfg_attr(feature = "serde", serde(alias = "Standard"))]
    Standard,
    #[cfg_attr(feature = "serde", serde(alias = "Expedited"))]
    Expedited,
}

impl RestoreTier {
    pub const ALL: [RestoreTier; 3] =
        [RestoreTier::Bulk, RestoreTier::Standard, RestoreTier::Expedited];

    /// Name used by the vault service API.
    pub fn as_str(self) -> &'static str {
        match self {
            RestoreTier::Bulk => "Bulk",
            RestoreTier::Standard => "Standard",
            RestoreTier::Expedited => "Expedited",
        }
    }
}

impl fmt::Display for RestoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestoreTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RestoreTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_and_lowercase_names() {
        assert_eq!("Bulk".parse::<RestoreTier>(), Ok(RestoreTier::Bulk));
        assert_eq!(
            "expedited".parse::<RestoreTier>(),
            Ok(RestoreTier::Expedited)
        );
        assert!("glacial".parse::<RestoreTier>().is_err());
    }
}
