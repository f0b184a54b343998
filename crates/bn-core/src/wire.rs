//! Wire formats that ride inside JSON fields.
//!
//! Transactions travel as hex strings of their serialized form. Bitcoin SV
//! transactions never carry witness data, so the codec always uses the
//! legacy layout (version, inputs, outputs, locktime) and encodes it field
//! by field. `Transaction`'s own consensus codec would switch to the BIP141
//! layout for zero-input transactions, which a BSV node cannot read.
//!
//! Amounts travel as JSON numbers in whole-coin units.

use bitcoin::consensus::encode::serialize;
use bitcoin::consensus::Decodable;
use bitcoin::hex::{DisplayHex, FromHex};
use bitcoin::{
    absolute, transaction, Amount, Denomination, SignedAmount, Transaction, TxIn, TxOut,
};

use crate::error::CoreError;

pub fn tx_to_bytes(tx: &Transaction) -> Vec<u8> {
    let mut bytes = serialize(&tx.version);
    bytes.extend(serialize(&tx.input));
    bytes.extend(serialize(&tx.output));
    bytes.extend(serialize(&tx.lock_time));
    bytes
}

pub fn tx_to_hex(tx: &Transaction) -> String {
    tx_to_bytes(tx).to_lower_hex_string()
}

pub fn tx_from_bytes(bytes: &[u8]) -> Result<Transaction, CoreError> {
    let mut reader = bytes;
    let version = transaction::Version::consensus_decode(&mut reader)
        .map_err(|e| CoreError::InvalidTxData(format!("invalid version: {e}")))?;
    let input = Vec::<TxIn>::consensus_decode(&mut reader)
        .map_err(|e| CoreError::InvalidTxData(format!("invalid inputs: {e}")))?;
    let output = Vec::<TxOut>::consensus_decode(&mut reader)
        .map_err(|e| CoreError::InvalidTxData(format!("invalid outputs: {e}")))?;
    let lock_time = absolute::LockTime::consensus_decode(&mut reader)
        .map_err(|e| CoreError::InvalidTxData(format!("invalid locktime: {e}")))?;

    if !reader.is_empty() {
        return Err(CoreError::InvalidTxData(format!(
            "{} trailing bytes after transaction",
            reader.len()
        )));
    }

    Ok(Transaction {
        version,
        lock_time,
        input,
        output,
    })
}

pub fn tx_from_hex(hex: &str) -> Result<Transaction, CoreError> {
    let bytes = Vec::<u8>::from_hex(hex.trim())
        .map_err(|e| CoreError::InvalidTxData(format!("invalid transaction hex: {e}")))?;
    tx_from_bytes(&bytes)
}

/// Parse a BSV amount from a JSON value. Balances may be negative, such as
/// a legacy account balance after moves between accounts.
///
/// Number values are parsed via `SignedAmount::from_float_in` to support
/// scientific notation, while string values are parsed via
/// `SignedAmount::from_str_in`.
pub fn parse_btc_signed_amount(
    method: &str,
    value: &serde_json::Value,
) -> Result<SignedAmount, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::decode(method, format!("invalid amount `{value}`")))?;
            SignedAmount::from_float_in(parsed, Denomination::Bitcoin)
                .map_err(|e| CoreError::decode(method, format!("invalid amount `{value}`: {e}")))
        }
        serde_json::Value::String(s) => SignedAmount::from_str_in(s, Denomination::Bitcoin)
            .map_err(|e| CoreError::decode(method, format!("invalid amount `{s}`: {e}"))),
        _ => Err(CoreError::decode(
            method,
            format!("expected numeric amount, got: {value}"),
        )),
    }
}

/// JSON form of an amount as the node expects it in parameters.
pub fn btc_amount_json(amount: Amount) -> serde_json::Value {
    serde_json::json!(amount.to_btc())
}
