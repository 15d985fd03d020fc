//! Protocol detection
//!
//! Maps the program ids invoked by a transaction onto at most one
//! `ProtocolInfo`. Detection is a static table lookup followed by a fixed
//! priority tiebreak: application protocols (DEXes, NFT programs, staking,
//! lending, bridges, privacy pools) outrank infrastructure programs
//! (token, compute-budget, system), so a Jupiter swap that also touches the
//! token program is detected as Jupiter, not as SPL token.

use std::collections::HashMap;

use lazy_static::lazy_static;
use tracing::debug;

use crate::types::protocol::{ProtocolCategory, ProtocolInfo};

// Program ids, grouped the way the priority order groups them

pub const JUPITER_V6_PROGRAM: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";
pub const JUPITER_V4_PROGRAM: &str = "JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB";
pub const RAYDIUM_AMM_PROGRAM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const ORCA_WHIRLPOOL_PROGRAM: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";

pub const METAPLEX_METADATA_PROGRAM: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";
pub const CANDY_MACHINE_V3_PROGRAM: &str = "CndyV3LdqHUfDLmE5naZjVN8rBZz4tqhdefbAnjHG3JR";
pub const BUBBLEGUM_PROGRAM: &str = "BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY";

pub const STAKE_PROGRAM: &str = "Stake11111111111111111111111111111111111111";
pub const MARINADE_PROGRAM: &str = "MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD";
pub const LIDO_PROGRAM: &str = "CrX7kMhLC3cSsXJdT7JDgqrRVWGnUpX3gfEfxxU2NVLi";

pub const SOLEND_PROGRAM: &str = "So1endDq2YkqhipRh3WViPa8hdiSpxWy6z3Z6tMCpAo";
pub const KAMINO_LEND_PROGRAM: &str = "KLend2g3cP87fffoy8q1mQqGKjrxjC8boSyAYavgmjD";
pub const MARGINFI_PROGRAM: &str = "MFv2hWf31Z9kbCa1snEPYctwafyhdvnV7FZnsebVacA";

pub const WORMHOLE_TOKEN_BRIDGE_PROGRAM: &str = "wormDTUJ6AWPNvk59vGQbDvGJmqbDTdgWgAqcLBCgUb";
pub const WORMHOLE_CORE_PROGRAM: &str = "worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth";
pub const DEBRIDGE_PROGRAM: &str = "dst5MGcFPoBeREFAA5E3tU5ij8m5uVYwkzkSAbsLbNo";

pub const PRIVACY_CASH_PROGRAM: &str = "9Y5TbJbmyJNjBW5mrmyGdS6yjGoDzRKTdgaK5KLtJErD";

pub const ASSOCIATED_TOKEN_PROGRAM: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const COMPUTE_BUDGET_PROGRAM: &str = "ComputeBudget111111111111111111111111111111";
pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

pub const MEMO_PROGRAM: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
pub const MEMO_V1_PROGRAM: &str = "Memo1UhkJRfHyvLMcVucJwxXeuD728EqVDDwQDxFMNo";

/// Privacy-Cash pool accounts. Relayer-submitted unshields never invoke the
/// pool program from the user's perspective, so the privacy classifier also
/// matches legs against these addresses directly.
pub const PRIVACY_CASH_POOL_ACCOUNTS: &[&str] = &[
    "6VxNCXwQWeGHTMbcUJFKdobhBYTLzjlWBGTRuBz5RBi7",
    "8dTrWhlTWPYvyCyYUZQ2FeDAqna2smLmPbPKc6eY41bq",
    "HcmP9QFuvhKc3b2TTSdbsc5EfsNZBvBMt5pAbvDQZ9y5",
];

/// Known relayer/sponsor addresses. Their presence annotates a transfer as
/// facilitated but does not change its semantics.
pub const KNOWN_FACILITATORS: &[&str] = &[
    "FAciLvd7u8dLkU64wKnvDaCCkYtcWdxhzEnYkSNVYtEZ",
    "HeLiuSrfPgqEuzMgSMZUzTCmBEzZrKCvjrKL8JFje5PS",
];

lazy_static! {
    /// Program id -> protocol record
    static ref PROTOCOL_MAP: HashMap<&'static str, ProtocolInfo> = {
        use ProtocolCategory::*;
        let entries: Vec<(&str, &str, &str, ProtocolCategory)> = vec![
            (JUPITER_V6_PROGRAM, "jupiter", "Jupiter", Dex),
            (JUPITER_V4_PROGRAM, "jupiter-v4", "Jupiter v4", Dex),
            (RAYDIUM_AMM_PROGRAM, "raydium", "Raydium", Dex),
            (ORCA_WHIRLPOOL_PROGRAM, "orca-whirlpool", "Orca Whirlpool", Dex),
            (METAPLEX_METADATA_PROGRAM, "metaplex", "Metaplex", NftMint),
            (CANDY_MACHINE_V3_PROGRAM, "candy-machine-v3", "Candy Machine v3", NftMint),
            (BUBBLEGUM_PROGRAM, "bubblegum", "Bubblegum", NftMint),
            (STAKE_PROGRAM, "stake", "Stake Program", Stake),
            (MARINADE_PROGRAM, "marinade", "Marinade", StakePool),
            (LIDO_PROGRAM, "lido", "Lido for Solana", StakePool),
            (SOLEND_PROGRAM, "solend", "Solend", Lending),
            (KAMINO_LEND_PROGRAM, "kamino-lend", "Kamino Lend", Lending),
            (MARGINFI_PROGRAM, "marginfi", "marginfi", Lending),
            (WORMHOLE_TOKEN_BRIDGE_PROGRAM, "wormhole", "Wormhole Token Bridge", Bridge),
            (WORMHOLE_CORE_PROGRAM, "wormhole-core", "Wormhole Core", Bridge),
            (DEBRIDGE_PROGRAM, "debridge", "deBridge", Bridge),
            (PRIVACY_CASH_PROGRAM, "privacy-cash", "Privacy Cash", Privacy),
            (ASSOCIATED_TOKEN_PROGRAM, "associated-token", "Associated Token Program", Token),
            (SPL_TOKEN_PROGRAM, "spl-token", "SPL Token Program", Token),
            (COMPUTE_BUDGET_PROGRAM, "compute-budget", "Compute Budget Program", ComputeBudget),
            (SYSTEM_PROGRAM, "system", "System Program", System),
        ];

        entries
            .into_iter()
            .map(|(program, id, name, category)| (program, ProtocolInfo::new(id, name, category)))
            .collect()
    };

    /// Fixed tiebreak order of protocol ids, highest priority first.
    /// Application protocols outrank infrastructure programs.
    static ref PRIORITY_ORDER: Vec<&'static str> = vec![
        "jupiter",
        "jupiter-v4",
        "raydium",
        "orca-whirlpool",
        "metaplex",
        "candy-machine-v3",
        "bubblegum",
        "stake",
        "marinade",
        "lido",
        "solend",
        "kamino-lend",
        "marginfi",
        "wormhole",
        "wormhole-core",
        "debridge",
        "privacy-cash",
        "associated-token",
        "spl-token",
        "compute-budget",
        "system",
    ];
}

/// Detect the protocol of a transaction from its invoked program ids.
///
/// Among all recognised programs, the protocol earliest in the priority
/// order wins; unrecognised inputs yield `None`. The result depends only on
/// the set of ids, not their order.
pub fn detect_protocol<S: AsRef<str>>(program_ids: &[S]) -> Option<ProtocolInfo> {
    let mut best: Option<(usize, &ProtocolInfo)> = None;

    for program_id in program_ids {
        let Some(protocol) = PROTOCOL_MAP.get(program_id.as_ref()) else {
            continue;
        };
        let rank = PRIORITY_ORDER
            .iter()
            .position(|id| *id == protocol.id)
            .unwrap_or(usize::MAX);

        match best {
            Some((best_rank, _)) if best_rank <= rank => {}
            _ => best = Some((rank, protocol)),
        }
    }

    if let Some((_, protocol)) = best {
        debug!("Detected protocol {} ({})", protocol.id, protocol.name);
        return Some(protocol.clone());
    }
    None
}

/// Look up the protocol record for a single program id
pub fn protocol_for_program(program_id: &str) -> Option<&'static ProtocolInfo> {
    PROTOCOL_MAP.get(program_id)
}

/// Whether the address is a known Privacy-Cash pool account
pub fn is_privacy_pool_account(address: &str) -> bool {
    PRIVACY_CASH_POOL_ACCOUNTS.contains(&address)
}

/// Whether the address is a known relayer/sponsor
pub fn is_known_facilitator(address: &str) -> bool {
    KNOWN_FACILITATORS.contains(&address)
}

/// Whether the address is any address the detected protocol owns: its own
/// program id, or (for privacy protocols) one of the known pool accounts.
pub fn is_protocol_owned_address(protocol: &ProtocolInfo, address: &str) -> bool {
    if protocol.category == ProtocolCategory::Privacy && is_privacy_pool_account(address) {
        return true;
    }
    PROTOCOL_MAP
        .get(address)
        .is_some_and(|candidate| candidate.id == protocol.id)
}
