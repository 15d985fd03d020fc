//! Solana JSON-RPC client with bounded-retry and hard deadlines
//!
//! One request path for every method: build the JSON-RPC body, send under a
//! deadline, retry transient failures with exponential backoff (rate-limit
//! responses back off twice as hard), surface everything else. Batch
//! transaction fetches dispatch in parallel under a concurrency cap and join
//! preserving input order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::RpcConfig;
use crate::detect::{MEMO_PROGRAM, MEMO_V1_PROGRAM, SPL_TOKEN_PROGRAM};
use crate::errors::{RpcError, RpcResult};
use crate::rpc::retry::{calculate_next_backoff, execute_with_deadline};
use crate::rpc::cache::DEFAULT_CACHE_CAPACITY;
use crate::rpc::{
    AccountSource, SignatureSource, TokenAccountBalance, TransactionCache, TransactionSource,
};
use crate::types::transaction::{RawTransaction, SignatureInfo, TokenBalance};

/// JSON-RPC client over HTTP
pub struct SolanaRpcClient {
    http: reqwest::Client,
    config: RpcConfig,
    semaphore: Arc<Semaphore>,
    error_count: Arc<AtomicU64>,
    cache: TransactionCache,
}

impl SolanaRpcClient {
    pub fn new(config: RpcConfig) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::ConnectionFailed(format!("HTTP client build failed: {}", e)))?;

        info!(
            "RPC client initialised for {} ({} concurrent requests, {} retries)",
            config.url, config.concurrent_requests, config.max_retries
        );

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.concurrent_requests)),
            config,
            error_count: Arc::new(AtomicU64::new(0)),
            cache: TransactionCache::with_capacity(DEFAULT_CACHE_CAPACITY),
        })
    }

    /// Cumulative count of failed request attempts
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Transaction cache statistics
    pub fn cache_stats(&self) -> crate::rpc::CacheStats {
        self.cache.stats()
    }

    /// One JSON-RPC call with retry, backoff and a per-attempt deadline
    async fn call(&self, method: &str, params: Value) -> RpcResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let mut attempts = 0;
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);

        loop {
            let request = self.http.post(&self.config.url).json(&body).send();

            let outcome = match execute_with_deadline(self.config.timeout_seconds, request).await {
                Ok(Ok(response)) => self.handle_response(method, response).await,
                Ok(Err(e)) => Err(RpcError::from(e)),
                Err(_) => Err(RpcError::Timeout {
                    timeout_seconds: self.config.timeout_seconds,
                    operation: method.to_string(),
                }),
            };

            match outcome {
                Ok(result) => {
                    if attempts > 0 {
                        debug!("{} succeeded after {} attempts", method, attempts + 1);
                    }
                    return Ok(result);
                }
                Err(e) if e.is_retryable() => {
                    attempts += 1;
                    self.error_count.fetch_add(1, Ordering::Relaxed);

                    if attempts >= self.config.max_retries {
                        error!("{} failed after {} attempts: {}", method, attempts, e);
                        return Err(RpcError::MaxRetriesExceeded {
                            operation: method.to_string(),
                        });
                    }

                    // Throttling signals get double the usual backoff
                    let wait = if matches!(e, RpcError::RateLimited(_)) {
                        backoff * 2
                    } else {
                        backoff
                    };
                    warn!(
                        "{} attempt {} failed, retrying in {:?}: {}",
                        method, attempts, wait, e
                    );
                    sleep(wait).await;

                    backoff = calculate_next_backoff(
                        backoff,
                        self.config.backoff_multiplier,
                        self.config.max_backoff_seconds,
                    );
                }
                Err(e) => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }
    }

    async fn handle_response(
        &self,
        method: &str,
        response: reqwest::Response,
    ) -> RpcResult<Value> {
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(RpcError::RateLimited(format!("{} throttled", method)));
        }
        if status.is_server_error() {
            return Err(RpcError::Network(format!("{} returned {}", method, status)));
        }
        if !status.is_success() {
            return Err(RpcError::Upstream {
                method: method.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            return Err(RpcError::Upstream {
                method: method.to_string(),
                message: error.to_string(),
            });
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| RpcError::InvalidResponse(format!("{}: missing result", method)))
    }

    async fn get_transaction(&self, signature: &str) -> RpcResult<Option<RawTransaction>> {
        if let Some(cached) = self.cache.lookup(signature) {
            return Ok(Some(cached));
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| RpcError::ConnectionFailed(format!("Semaphore closed: {}", e)))?;

        let params = json!([
            signature,
            {
                "encoding": "jsonParsed",
                "commitment": self.config.commitment,
                "maxSupportedTransactionVersion": 0,
            }
        ]);
        let result = self.call("getTransaction", params).await?;

        if result.is_null() {
            debug!("Transaction {} not found", signature);
            return Ok(None);
        }

        let transaction = parse_raw_transaction(signature, &result)?;
        self.cache.store(transaction.clone());
        Ok(Some(transaction))
    }
}

#[async_trait]
impl SignatureSource for SolanaRpcClient {
    async fn fetch_signatures(
        &self,
        address: &str,
        limit: usize,
        before: Option<&str>,
        until: Option<&str>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        let mut options = serde_json::Map::new();
        options.insert("limit".to_string(), json!(limit));
        options.insert("commitment".to_string(), json!(self.config.commitment));
        if let Some(before) = before {
            options.insert("before".to_string(), json!(before));
        }
        if let Some(until) = until {
            options.insert("until".to_string(), json!(until));
        }

        let result = self
            .call("getSignaturesForAddress", json!([address, options]))
            .await?;
        let entries = result
            .as_array()
            .ok_or_else(|| RpcError::InvalidResponse("signature list is not an array".to_string()))?;

        let mut signatures = Vec::with_capacity(entries.len());
        for entry in entries {
            let signature = entry
                .get("signature")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    RpcError::InvalidResponse("signature entry missing signature".to_string())
                })?;
            signatures.push(SignatureInfo {
                signature: signature.to_string(),
                slot: entry.get("slot").and_then(Value::as_u64).unwrap_or(0),
                block_time: entry.get("blockTime").and_then(Value::as_i64),
                err: entry
                    .get("err")
                    .filter(|err| !err.is_null())
                    .map(Value::to_string),
                memo: entry
                    .get("memo")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }

        debug!(
            "Fetched {} signatures for {} (before={:?})",
            signatures.len(),
            address,
            before
        );
        Ok(signatures)
    }
}

#[async_trait]
impl TransactionSource for SolanaRpcClient {
    async fn fetch_transactions(
        &self,
        signatures: &[String],
    ) -> RpcResult<Vec<Option<RawTransaction>>> {
        // Parallel dispatch, order-preserving join; the semaphore inside
        // get_transaction caps actual concurrency
        let fetches = signatures
            .iter()
            .map(|signature| self.get_transaction(signature));
        let results = join_all(fetches).await;

        let mut transactions = Vec::with_capacity(results.len());
        for result in results {
            transactions.push(result?);
        }
        Ok(transactions)
    }
}

#[async_trait]
impl AccountSource for SolanaRpcClient {
    async fn fetch_native_balance(&self, address: &str) -> RpcResult<u64> {
        let result = self
            .call(
                "getBalance",
                json!([address, {"commitment": self.config.commitment}]),
            )
            .await?;
        result
            .get("value")
            .and_then(Value::as_u64)
            .ok_or_else(|| RpcError::InvalidResponse("getBalance missing value".to_string()))
    }

    async fn fetch_token_balances(&self, address: &str) -> RpcResult<Vec<TokenAccountBalance>> {
        let params = json!([
            address,
            {"programId": SPL_TOKEN_PROGRAM},
            {"encoding": "jsonParsed", "commitment": self.config.commitment}
        ]);
        let result = self.call("getTokenAccountsByOwner", params).await?;

        let accounts = result
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RpcError::InvalidResponse("token account list is not an array".to_string())
            })?;

        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let info = &account["account"]["data"]["parsed"]["info"];
            let Some(mint) = info.get("mint").and_then(Value::as_str) else {
                continue;
            };
            let token_amount = &info["tokenAmount"];
            let raw_amount = token_amount
                .get("amount")
                .and_then(Value::as_str)
                .and_then(|amount| amount.parse::<u128>().ok())
                .unwrap_or(0);
            let decimals = token_amount
                .get("decimals")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u8;

            balances.push(TokenAccountBalance {
                mint: mint.to_string(),
                decimals,
                raw_amount,
            });
        }
        Ok(balances)
    }
}

/// Decode a `getTransaction` result into the engine's raw record
fn parse_raw_transaction(signature: &str, result: &Value) -> RpcResult<RawTransaction> {
    let meta = result
        .get("meta")
        .filter(|meta| !meta.is_null())
        .ok_or_else(|| RpcError::InvalidResponse(format!("{}: missing meta", signature)))?;
    let message = &result["transaction"]["message"];

    let account_keys = parse_account_keys(&message["accountKeys"]);
    let program_ids = parse_program_ids(message, meta);
    let memo = parse_memo(message);

    Ok(RawTransaction {
        signature: signature.to_string(),
        slot: result.get("slot").and_then(Value::as_u64).unwrap_or(0),
        block_time: result.get("blockTime").and_then(Value::as_i64),
        err: meta
            .get("err")
            .filter(|err| !err.is_null())
            .map(Value::to_string),
        program_ids,
        protocol: None, // the detector fills this
        account_keys,
        memo,
        fee: meta.get("fee").and_then(Value::as_u64).unwrap_or(0),
        pre_balances: parse_lamport_array(meta.get("preBalances")),
        post_balances: parse_lamport_array(meta.get("postBalances")),
        pre_token_balances: parse_token_balances(meta.get("preTokenBalances")),
        post_token_balances: parse_token_balances(meta.get("postTokenBalances")),
    })
}

/// Account keys arrive as plain strings (json encoding) or as objects with a
/// `pubkey` field (jsonParsed encoding)
fn parse_account_keys(value: &Value) -> Vec<String> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            entry
                .as_str()
                .or_else(|| entry.get("pubkey").and_then(Value::as_str))
                .map(str::to_string)
        })
        .collect()
}

/// Program ids from top-level and inner instructions
fn parse_program_ids(message: &Value, meta: &Value) -> Vec<String> {
    let mut program_ids = Vec::new();

    let mut collect = |instructions: Option<&Value>| {
        let Some(instructions) = instructions.and_then(Value::as_array) else {
            return;
        };
        for instruction in instructions {
            if let Some(program_id) = instruction.get("programId").and_then(Value::as_str) {
                if !program_ids.iter().any(|known: &String| known == program_id) {
                    program_ids.push(program_id.to_string());
                }
            }
        }
    };

    collect(message.get("instructions"));

    if let Some(inner) = meta.get("innerInstructions").and_then(Value::as_array) {
        for group in inner {
            collect(group.get("instructions"));
        }
    }

    program_ids
}

/// A memo instruction's parsed payload, when one is present
fn parse_memo(message: &Value) -> Option<String> {
    let instructions = message.get("instructions")?.as_array()?;
    instructions.iter().find_map(|instruction| {
        let program_id = instruction.get("programId").and_then(Value::as_str)?;
        if program_id != MEMO_PROGRAM && program_id != MEMO_V1_PROGRAM {
            return None;
        }
        instruction
            .get("parsed")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

fn parse_lamport_array(value: Option<&Value>) -> Vec<u64> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| entry.as_u64().unwrap_or(0))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_token_balances(value: Option<&Value>) -> Vec<TokenBalance> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let mint = entry.get("mint").and_then(Value::as_str)?;
            let amount = &entry["uiTokenAmount"];
            Some(TokenBalance {
                account_index: entry.get("accountIndex").and_then(Value::as_u64)? as usize,
                mint: mint.to_string(),
                owner: entry
                    .get("owner")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                decimals: amount.get("decimals").and_then(Value::as_u64).unwrap_or(0) as u8,
                raw_amount: amount
                    .get("amount")
                    .and_then(Value::as_str)
                    .and_then(|raw| raw.parse::<u128>().ok())
                    .unwrap_or(0),
            })
        })
        .collect()
}
