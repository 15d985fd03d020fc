//! Protocol identity for detected on-chain programs

use serde::{Deserialize, Serialize};

/// Functional category of a recognised protocol.
///
/// Membership is data carried on the protocol record, not a type split:
/// classifiers branch on the category of whatever protocol the detector
/// attached to the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolCategory {
    Dex,
    Stake,
    StakePool,
    Lending,
    NftMint,
    Bridge,
    Privacy,
    Token,
    System,
    ComputeBudget,
}

/// A recognised protocol: stable slug id plus display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    pub id: String,
    pub name: String,
    pub category: ProtocolCategory,
}

impl ProtocolInfo {
    pub fn new(id: &str, name: &str, category: ProtocolCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
        }
    }

    pub fn is_dex(&self) -> bool {
        self.category == ProtocolCategory::Dex
    }

    /// Stake programs and liquid-staking pools both count as staking
    pub fn is_stake(&self) -> bool {
        matches!(
            self.category,
            ProtocolCategory::Stake | ProtocolCategory::StakePool
        )
    }

    pub fn is_nft_mint(&self) -> bool {
        self.category == ProtocolCategory::NftMint
    }

    pub fn is_bridge(&self) -> bool {
        self.category == ProtocolCategory::Bridge
    }

    pub fn is_privacy(&self) -> bool {
        self.category == ProtocolCategory::Privacy
    }

    pub fn is_lending(&self) -> bool {
        self.category == ProtocolCategory::Lending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_predicates() {
        let jupiter = ProtocolInfo::new("jupiter", "Jupiter", ProtocolCategory::Dex);
        assert!(jupiter.is_dex());
        assert!(!jupiter.is_stake());

        let marinade = ProtocolInfo::new("marinade", "Marinade", ProtocolCategory::StakePool);
        assert!(marinade.is_stake());
        assert!(!marinade.is_dex());

        let stake = ProtocolInfo::new("stake", "Stake Program", ProtocolCategory::Stake);
        assert!(stake.is_stake());
    }
}
