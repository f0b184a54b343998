//! Shared test helpers for `bn-core` unit tests.
//!
//! One deterministic transaction (`sample_tx`) with its known wire hex, and
//! small builders for txids and scripts.

use bitcoin::hashes::Hash;
use bitcoin::{
    absolute, transaction, Amount, OutPoint, PubkeyHash, ScriptBuf, Sequence, Transaction, TxIn,
    TxOut, Txid, Witness,
};

/// Wire hex of [`sample_tx`].
pub const SAMPLE_TX_HEX: &str = "01000000010100000000000000000000000000000000000000000000000000000000000000000000000151ffffffff01e8030000000000001976a914111111111111111111111111111111111111111188ac00000000";

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// P2PKH locking script paying to a hash of twenty `0x11` bytes.
pub fn sample_p2pkh_script() -> ScriptBuf {
    ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([0x11; 20]))
}

/// Version 1, one input spending `txid_from_byte(1):0`, one 1000 sat P2PKH
/// output, locktime 0.
pub fn sample_tx() -> Transaction {
    Transaction {
        version: transaction::Version::ONE,
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::new(txid_from_byte(1), 0),
            script_sig: ScriptBuf::from_bytes(vec![0x51]),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(1_000),
            script_pubkey: sample_p2pkh_script(),
        }],
    }
}

/// Wrap a result value in a successful JSON-RPC envelope.
pub fn ok_envelope(result: serde_json::Value) -> String {
    serde_json::json!({ "result": result, "error": null, "id": 1 }).to_string()
}
