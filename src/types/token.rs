//! Token identity and amount representation
//!
//! Amounts are carried in two forms: `raw_units` (a nonnegative decimal
//! integer string in the token's smallest unit, authoritative) and `ui_units`
//! (the human-scale float derived from it). Conversion is total in both
//! directions; raw-to-ui never fails and ui-to-raw rounds half to even.

use serde::{Deserialize, Serialize};

/// Wrapped-SOL mint, used as the identity of the native token throughout
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// Native token decimals (lamports per SOL = 10^9)
pub const NATIVE_DECIMALS: u8 = 9;

/// Token identity and display metadata. Identity is the mint address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_uri: Option<String>,
}

impl TokenInfo {
    /// Construct the native SOL token record
    pub fn native() -> Self {
        Self {
            mint: NATIVE_MINT.to_string(),
            symbol: "SOL".to_string(),
            name: "Solana".to_string(),
            decimals: NATIVE_DECIMALS,
            logo_uri: None,
        }
    }

    /// Deterministic placeholder for a mint with no known metadata.
    ///
    /// Symbol is the first 8 characters of the mint so unknown tokens remain
    /// distinguishable in a feed without pretending to know anything else.
    pub fn placeholder(mint: &str, decimals: u8) -> Self {
        let short: String = mint.chars().take(8).collect();
        Self {
            mint: mint.to_string(),
            symbol: short.clone(),
            name: format!("Unknown Token ({}…)", short),
            decimals,
            logo_uri: None,
        }
    }

    /// Whether this record is the deterministic unknown-token placeholder
    pub fn is_placeholder(&self) -> bool {
        let short: String = self.mint.chars().take(8).collect();
        self.symbol == short
    }

    /// Whether this token is native SOL (or its wrapped form)
    pub fn is_native(&self) -> bool {
        self.mint == NATIVE_MINT
    }
}

/// A token amount in both raw and ui form. `raw_units` is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub token: TokenInfo,
    /// Nonnegative decimal integer string in the token's smallest unit
    pub raw_units: String,
    /// `raw_units / 10^decimals`, for display and threshold checks
    pub ui_units: f64,
}

impl MoneyAmount {
    /// Build an amount from raw units
    pub fn from_raw(token: TokenInfo, raw: u128) -> Self {
        let ui = ui_amount(raw, token.decimals);
        Self {
            token,
            raw_units: raw.to_string(),
            ui_units: ui,
        }
    }

    /// Build an amount from a ui value (rounds half to even into raw units)
    pub fn from_ui(token: TokenInfo, ui: f64) -> Self {
        let raw = raw_amount(ui, token.decimals);
        Self {
            token,
            raw_units: raw.to_string(),
            ui_units: ui,
        }
    }

    /// Parse the authoritative raw units. Malformed strings read as zero.
    pub fn raw(&self) -> u128 {
        self.raw_units.parse().unwrap_or(0)
    }
}

/// Convert raw units to a ui value: `raw / 10^decimals`.
///
/// # Examples
/// ```
/// use tx_indexer::types::ui_amount;
///
/// assert_eq!(ui_amount(1_500_000_000, 9), 1.5);
/// assert_eq!(ui_amount(0, 6), 0.0);
/// ```
pub fn ui_amount(raw: u128, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

/// Convert a ui value to raw units, rounding half to even.
///
/// Negative or non-finite inputs clamp to zero; raw units are nonnegative
/// by definition.
///
/// # Examples
/// ```
/// use tx_indexer::types::raw_amount;
///
/// assert_eq!(raw_amount(1.5, 9), 1_500_000_000);
/// assert_eq!(raw_amount(0.0000025, 6), 2); // half to even: 2.5 -> 2
/// assert_eq!(raw_amount(0.0000035, 6), 4); // half to even: 3.5 -> 4
/// ```
pub fn raw_amount(ui: f64, decimals: u8) -> u128 {
    let scaled = ui * 10f64.powi(decimals as i32);
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }

    let floor = scaled.floor();
    let frac = scaled - floor;
    let half_distance = (frac - 0.5).abs();

    // Tolerant tie detection: the scaling multiply itself can perturb an
    // exact .5 by a few ulps
    if half_distance < 1e-9 {
        // Exact tie: round to the even neighbour
        let floor_int = floor as u128;
        if floor_int % 2 == 0 {
            floor_int
        } else {
            floor_int + 1
        }
    } else {
        scaled.round() as u128
    }
}
