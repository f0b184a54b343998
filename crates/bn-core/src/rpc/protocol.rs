use serde::Deserialize;

use crate::error::CoreError;

/// Version string sent in every request. Bitcoin SV nodes speak the
/// bitcoind 1.0 dialect and ignore the field, but echo `id`.
pub(crate) const JSONRPC_VERSION: &str = "1.0";

#[derive(serde::Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) id: u64,
    pub(crate) method: &'a str,
    pub(crate) params: &'a [serde_json::Value],
}

#[derive(Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub(crate) result: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
}

/// Map the envelope's `error` member for `method`.
///
/// A `{code, message}` object is the node rejecting the call and is kept
/// verbatim as [`CoreError::Rpc`]. Any other shape means the peer does not
/// speak the bitcoind dialect, which is a [`CoreError::Decode`] naming the
/// method.
pub(crate) fn rpc_error_from_value(method: &str, error: serde_json::Value) -> CoreError {
    #[derive(Deserialize)]
    struct NodeError {
        code: i64,
        message: String,
    }

    match NodeError::deserialize(&error) {
        Ok(NodeError { code, message }) => CoreError::Rpc { code, message },
        Err(_) => CoreError::decode(method, format!("unexpected error member: {error}")),
    }
}

/// Split a raw response body into the node's result, or the error it
/// reported. A `null` error is treated as absent.
pub(crate) fn decode_envelope(method: &str, body: &str) -> Result<serde_json::Value, CoreError> {
    let decoded: JsonRpcResponse = serde_json::from_str(body).map_err(|e| {
        CoreError::decode(method, format!("invalid JSON-RPC envelope: {e}; body={body}"))
    })?;

    if let Some(err) = decoded.error.filter(|e| !e.is_null()) {
        return Err(rpc_error_from_value(method, err));
    }

    Ok(decoded.result.unwrap_or(serde_json::Value::Null))
}
