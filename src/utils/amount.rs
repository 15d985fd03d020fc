//! Native-amount formatting utilities
//!
//! Standardised dual SOL + lamports display for logs and diagnostics.

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Format a lamport amount as dual SOL + lamports display
///
/// # Examples
/// ```
/// use tx_indexer::utils::amount::format_lamports_as_sol;
///
/// assert_eq!(
///     format_lamports_as_sol(1_500_000_000),
///     "1.500000000 SOL (1500000000 lamports)"
/// );
/// assert_eq!(format_lamports_as_sol(5_000), "0.000005000 SOL (5000 lamports)");
/// ```
pub fn format_lamports_as_sol(lamports: u64) -> String {
    let sol = lamports as f64 / LAMPORTS_PER_SOL;
    format!("{:.9} SOL ({} lamports)", sol, lamports)
}
