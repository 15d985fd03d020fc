//! Opaque account-identifier codec
//!
//! Account ids are plain strings in one of four shapes:
//!
//! - `wallet:<addr>` - the wallet the caller asked about
//! - `external:<addr>` - any other on-chain address
//! - `protocol:<id>[:<token>]:<addr>` - an address recognised as protocol state
//! - `fee:network` - the network fee sink (singleton)
//!
//! This module is the only place the syntax is defined. Classifiers must go
//! through [`parse_account_id`] (or [`strip_external_tag`] for the one
//! sanctioned shortcut) rather than splitting strings themselves.

use serde::{Deserialize, Serialize};

/// The singleton network-fee account id
pub const NETWORK_FEE_ACCOUNT: &str = "fee:network";

/// Build a `wallet:` account id
pub fn wallet_account(address: &str) -> String {
    format!("wallet:{}", address)
}

/// Build an `external:` account id
pub fn external_account(address: &str) -> String {
    format!("external:{}", address)
}

/// Build a `protocol:` account id, with an optional token qualifier
pub fn protocol_account(protocol_id: &str, token: Option<&str>, address: &str) -> String {
    match token {
        Some(token) => format!("protocol:{}:{}:{}", protocol_id, token, address),
        None => format!("protocol:{}:{}", protocol_id, address),
    }
}

/// The network-fee account id (singleton form)
pub fn network_fee_account() -> &'static str {
    NETWORK_FEE_ACCOUNT
}

/// Parsed view of an account id. Fields are absent when not applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedAccountId {
    Wallet {
        address: String,
    },
    External {
        address: String,
    },
    Protocol {
        protocol_id: String,
        token: Option<String>,
        address: String,
    },
    NetworkFee,
    Unknown,
}

/// Parse any account-id string. Unrecognised shapes yield `Unknown`.
pub fn parse_account_id(account_id: &str) -> ParsedAccountId {
    if account_id == NETWORK_FEE_ACCOUNT {
        return ParsedAccountId::NetworkFee;
    }

    if let Some(address) = account_id.strip_prefix("wallet:") {
        if !address.is_empty() {
            return ParsedAccountId::Wallet {
                address: address.to_string(),
            };
        }
        return ParsedAccountId::Unknown;
    }

    if let Some(address) = account_id.strip_prefix("external:") {
        if !address.is_empty() {
            return ParsedAccountId::External {
                address: address.to_string(),
            };
        }
        return ParsedAccountId::Unknown;
    }

    if let Some(rest) = account_id.strip_prefix("protocol:") {
        let parts: Vec<&str> = rest.split(':').collect();
        return match parts.as_slice() {
            [protocol_id, address] if !protocol_id.is_empty() && !address.is_empty() => {
                ParsedAccountId::Protocol {
                    protocol_id: protocol_id.to_string(),
                    token: None,
                    address: address.to_string(),
                }
            }
            [protocol_id, token, address]
                if !protocol_id.is_empty() && !token.is_empty() && !address.is_empty() =>
            {
                ParsedAccountId::Protocol {
                    protocol_id: protocol_id.to_string(),
                    token: Some(token.to_string()),
                    address: address.to_string(),
                }
            }
            _ => ParsedAccountId::Unknown,
        };
    }

    ParsedAccountId::Unknown
}

/// Strip the leading `external:` tag, yielding the raw address.
///
/// The single sanctioned string shortcut for classifiers that need the bare
/// address of an external account. Returns `None` for any other shape.
pub fn strip_external_tag(account_id: &str) -> Option<&str> {
    account_id
        .strip_prefix("external:")
        .filter(|address| !address.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    #[test]
    fn test_round_trip_wallet() {
        let id = wallet_account(ADDR);
        assert_eq!(
            parse_account_id(&id),
            ParsedAccountId::Wallet {
                address: ADDR.to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_external() {
        let id = external_account(ADDR);
        assert_eq!(
            parse_account_id(&id),
            ParsedAccountId::External {
                address: ADDR.to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_protocol_without_token() {
        let id = protocol_account("jupiter", None, ADDR);
        assert_eq!(id, format!("protocol:jupiter:{}", ADDR));
        assert_eq!(
            parse_account_id(&id),
            ParsedAccountId::Protocol {
                protocol_id: "jupiter".to_string(),
                token: None,
                address: ADDR.to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_protocol_with_token() {
        let id = protocol_account("solend", Some("USDC"), ADDR);
        assert_eq!(
            parse_account_id(&id),
            ParsedAccountId::Protocol {
                protocol_id: "solend".to_string(),
                token: Some("USDC".to_string()),
                address: ADDR.to_string()
            }
        );
    }

    #[test]
    fn test_network_fee_singleton() {
        assert_eq!(
            parse_account_id(network_fee_account()),
            ParsedAccountId::NetworkFee
        );
    }

    #[test]
    fn test_unrecognised_shapes_are_unknown() {
        assert_eq!(parse_account_id(""), ParsedAccountId::Unknown);
        assert_eq!(parse_account_id("fee:validator"), ParsedAccountId::Unknown);
        assert_eq!(parse_account_id("wallet:"), ParsedAccountId::Unknown);
        assert_eq!(parse_account_id("protocol:jupiter"), ParsedAccountId::Unknown);
        assert_eq!(parse_account_id(ADDR), ParsedAccountId::Unknown);
    }

    #[test]
    fn test_strip_external_tag() {
        assert_eq!(strip_external_tag(&external_account(ADDR)), Some(ADDR));
        assert_eq!(strip_external_tag(&wallet_account(ADDR)), None);
        assert_eq!(strip_external_tag("external:"), None);
    }
}
