//! Built-in devnet token table
//!
//! Devnet carries far fewer well-known mints; anything else resolves to the
//! placeholder (devnet never consults the network for metadata).

use std::collections::HashMap;

use crate::types::token::{TokenInfo, NATIVE_DECIMALS, NATIVE_MINT};

fn token(mint: &str, symbol: &str, name: &str, decimals: u8) -> (String, TokenInfo) {
    (
        mint.to_string(),
        TokenInfo {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            logo_uri: None,
        },
    )
}

pub(super) fn builtin_tokens() -> HashMap<String, TokenInfo> {
    HashMap::from([
        token(NATIVE_MINT, "SOL", "Solana", NATIVE_DECIMALS),
        token(
            "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
            "USDC",
            "USD Coin (Devnet)",
            6,
        ),
        token(
            "EJwZgeZrdC8TXTQbQBoL6bfuAnFUUy1PVCMB4DYPzVaS",
            "USDT",
            "Tether USD (Devnet)",
            6,
        ),
    ])
}
