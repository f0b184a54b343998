use crate::args::CallingConvention;
use crate::error::CoreError;
use crate::types::ChainInfo;

use super::{decode_json, RpcMethod};

/// `getblockchaininfo`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetBlockchainInfo;

impl RpcMethod for GetBlockchainInfo {
    const NAME: &'static str = "getblockchaininfo";
    type Output = ChainInfo;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(CallingConvention::none())
    }

    fn decode(result: serde_json::Value) -> Result<ChainInfo, CoreError> {
        decode_json(Self::NAME, result)
    }
}
