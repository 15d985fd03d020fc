//! Built-in mainnet token table

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
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "USDC",
            "USD Coin",
            6,
        ),
        token(
            "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB",
            "USDT",
            "Tether USD",
            6,
        ),
        token(
            "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So",
            "mSOL",
            "Marinade staked SOL",
            9,
        ),
        token(
            "J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn",
            "JitoSOL",
            "Jito Staked SOL",
            9,
        ),
        token(
            "7dHbWXmci3dT8UFYWYZweBLXgycu7Y3iL6trKn1Y7ARj",
            "stSOL",
            "Lido Staked SOL",
            9,
        ),
        token(
            "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",
            "JUP",
            "Jupiter",
            6,
        ),
        token(
            "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
            "BONK",
            "Bonk",
            5,
        ),
        token(
            "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R",
            "RAY",
            "Raydium",
            6,
        ),
        token(
            "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE",
            "ORCA",
            "Orca",
            6,
        ),
        token(
            "7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs",
            "WETH",
            "Wrapped Ether (Wormhole)",
            8,
        ),
        token(
            "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh",
            "WBTC",
            "Wrapped BTC (Wormhole)",
            8,
        ),
    ])
}
