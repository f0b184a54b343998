//! Domain types exchanged with the node.
//!
//! Contains the blacklist and confiscation descriptors, UTXO/prevout
//! records used when building and signing transactions, and the structured
//! results of wallet and chain queries.

use bitcoin::{Amount, BlockHash, ScriptBuf, Transaction, Txid};
use serde::{Deserialize, Serialize};

use crate::wire::tx_to_hex;

fn is_false(value: &bool) -> bool {
    !*value
}

// ==============================================================================
// Blacklists
// ==============================================================================

/// Block-height window during which a blacklist entry is enforced. An open
/// `stop` enforces indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enforce {
    pub start: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<u32>,
}

/// An output to freeze or unfreeze. Enforcement windows and the policy
/// expiry flag are omitted from the wire when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    #[serde(rename = "txId")]
    pub tx_id: Txid,
    pub vout: u32,
    #[serde(
        rename = "enforceAtHeight",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub enforce_at_height: Vec<Enforce>,
    #[serde(
        rename = "policyExpiresWithConsensus",
        default,
        skip_serializing_if = "is_false"
    )]
    pub policy_expires_with_consensus: bool,
}

impl Fund {
    pub fn new(tx_id: Txid, vout: u32) -> Self {
        Self {
            tx_id,
            vout,
            enforce_at_height: Vec::new(),
            policy_expires_with_consensus: false,
        }
    }

    pub fn enforced(mut self, start: u32, stop: Option<u32>) -> Self {
        self.enforce_at_height.push(Enforce { start, stop });
        self
    }

    pub fn policy_expires_with_consensus(mut self) -> Self {
        self.policy_expires_with_consensus = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlacklistArgs {
    pub funds: Vec<Fund>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutRef {
    #[serde(rename = "txId")]
    pub tx_id: Txid,
    pub vout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotProcessedFund {
    #[serde(rename = "txOut")]
    pub tx_out: TxOutRef,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "notProcessed", default)]
    pub not_processed: Vec<NotProcessedFund>,
}

// ==============================================================================
// Confiscation Whitelist
// ==============================================================================

/// A confiscation transaction to whitelist from `enforce_at_height` on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiscationTransaction {
    pub enforce_at_height: u32,
    pub tx: Transaction,
}

impl Serialize for ConfiscationTransaction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Inner {
            #[serde(rename = "enforceAtHeight")]
            enforce_at_height: u32,
            hex: String,
        }
        #[derive(Serialize)]
        struct Outer {
            #[serde(rename = "confiscationTx")]
            confiscation_tx: Inner,
        }

        Outer {
            confiscation_tx: Inner {
                enforce_at_height: self.enforce_at_height,
                hex: tx_to_hex(&self.tx),
            },
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfiscationWhitelistArgs {
    #[serde(rename = "confiscationTxs")]
    pub confiscation_txs: Vec<ConfiscationTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfiscationTxRef {
    #[serde(rename = "txId")]
    pub tx_id: Txid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotProcessedConfiscation {
    #[serde(rename = "confiscationTx")]
    pub confiscation_tx: ConfiscationTxRef,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfiscationWhitelistResponse {
    #[serde(rename = "notProcessed", default)]
    pub not_processed: Vec<NotProcessedConfiscation>,
}

// ==============================================================================
// Transaction Building
// ==============================================================================

/// An unspent output to spend in `createrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptBuf,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
}

/// A previous output the node may not know about, supplied to
/// `signrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrevTx {
    pub txid: Txid,
    pub vout: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptBuf,
    #[serde(rename = "redeemScript", skip_serializing_if = "Option::is_none")]
    pub redeem_script: Option<ScriptBuf>,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
}

impl From<Utxo> for PrevTx {
    fn from(utxo: Utxo) -> Self {
        Self {
            txid: utxo.txid,
            vout: utxo.vout,
            script_pub_key: utxo.script_pub_key,
            redeem_script: None,
            amount: utxo.amount,
        }
    }
}

/// Result of `fundrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundRawTransaction {
    pub tx: Transaction,
    pub fee: Amount,
    /// Index of the added change output, `-1` when none was added.
    pub change_position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SigningError {
    pub txid: Txid,
    pub vout: u32,
    #[serde(rename = "scriptSig", default)]
    pub script_sig: String,
    #[serde(default)]
    pub sequence: u32,
    pub error: String,
}

/// Result of `signrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRawTransaction {
    pub tx: Transaction,
    pub complete: bool,
    pub errors: Vec<SigningError>,
}

// ==============================================================================
// Batch Broadcast
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollidedTx {
    pub txid: Txid,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvalidTx {
    pub txid: Txid,
    pub reject_code: i64,
    pub reject_reason: String,
    #[serde(rename = "collidedWith", default)]
    pub collided_with: Vec<CollidedTx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AncestorInput {
    pub txid: Txid,
    pub vout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnconfirmedAncestor {
    pub txid: Txid,
    #[serde(default)]
    pub vin: Vec<AncestorInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnconfirmedTx {
    pub txid: Txid,
    #[serde(default)]
    pub ancestors: Vec<UnconfirmedAncestor>,
}

/// Result of `sendrawtransactions`. Every list is empty when all
/// transactions were accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendRawTransactionsResponse {
    #[serde(default)]
    pub known: Vec<Txid>,
    #[serde(default)]
    pub evicted: Vec<Txid>,
    #[serde(default)]
    pub invalid: Vec<InvalidTx>,
    #[serde(default)]
    pub unconfirmed: Vec<UnconfirmedTx>,
}

// ==============================================================================
// Wallet
// ==============================================================================

/// One entry of `listunspent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptBuf,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    pub confirmations: u64,
    #[serde(default)]
    pub spendable: bool,
    #[serde(default)]
    pub solvable: bool,
}

impl From<UnspentOutput> for Utxo {
    fn from(unspent: UnspentOutput) -> Self {
        Self {
            txid: unspent.txid,
            vout: unspent.vout,
            script_pub_key: unspent.script_pub_key,
            amount: unspent.amount,
        }
    }
}

/// Subset of `getwalletinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletInfo {
    #[serde(rename = "walletversion")]
    pub wallet_version: u64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub balance: Amount,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub unconfirmed_balance: Amount,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub immature_balance: Amount,
    #[serde(rename = "txcount")]
    pub tx_count: u64,
    #[serde(rename = "keypoolsize", default)]
    pub keypool_size: u64,
    #[serde(default)]
    pub unlocked_until: Option<u64>,
}

// ==============================================================================
// Chain Info
// ==============================================================================

/// Basic chain information from `getblockchaininfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(default)]
    pub headers: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: BlockHash,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub pruned: bool,
}
