use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Parsed vault ARN, e.g. `arn:aws:glacier:us-east-1:123456789012:vaults/photos`.
///
/// Inventories carry the vault they describe in this form; the account id
/// and vault name used for every API call are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultArn {
    raw: String,
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub vault_name: String,
}

impl VaultArn {
    pub fn parse(arn: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &'static str| ModelError::InvalidArn {
            arn: arn.to_string(),
            reason,
        };

        let mut sections = arn.trim().splitn(6, ':');
        let (
            Some(prefix),
            Some(partition),
            Some(service),
            Some(region),
            Some(account_id),
            Some(resource),
        ) = (
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
        )
        else {
            return Err(invalid("expected six ':'-separated sections"));
        };

        if prefix != "arn" {
            return Err(invalid("missing 'arn' prefix"));
        }
        if partition.is_empty() {
            return Err(invalid("missing partition"));
        }
        if service != "glacier" {
            return Err(invalid("not a glacier ARN"));
        }
        if account_id.is_empty() {
            return Err(invalid("missing account id"));
        }

        let vault_name = resource
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        if vault_name.is_empty() {
            return Err(invalid("missing vault name"));
        }

        Ok(Self {
            raw: arn.trim().to_string(),
            partition: partition.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            vault_name: vault_name.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for VaultArn {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VaultArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
