//! Typed node methods.
//!
//! Every supported RPC is one [`RpcMethod`] implementation: the parameter
//! object, how it is laid out on the wire, and how the result is decoded.

pub mod blacklist;
pub mod chain;
pub mod transaction;
pub mod wallet;

use serde::de::DeserializeOwned;

use crate::args::CallingConvention;
use crate::error::CoreError;
use crate::wire::tx_from_hex;

pub trait RpcMethod {
    /// Method name as the node knows it.
    const NAME: &'static str;

    type Output;

    fn build_args(&self) -> Result<CallingConvention, CoreError>;

    fn decode(result: serde_json::Value) -> Result<Self::Output, CoreError>;
}

/// Direct JSON-to-struct decoding of a method's result.
pub(crate) fn decode_json<T: DeserializeOwned>(
    method: &str,
    result: serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(result).map_err(|e| CoreError::decode(method, e.to_string()))
}

/// Second decoding stage for results carrying a transaction as wire hex.
/// JSON shape problems are reported by the caller as `Decode`; a bad hex
/// payload surfaces as `InvalidTxData`.
pub(crate) fn decode_tx_hex(
    method: &str,
    hex: &str,
) -> Result<bitcoin::Transaction, CoreError> {
    tx_from_hex(hex).map_err(|err| match err {
        CoreError::InvalidTxData(message) => {
            CoreError::InvalidTxData(format!("`{method}` returned {message}"))
        }
        other => other,
    })
}
