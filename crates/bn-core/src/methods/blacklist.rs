//! Blacklist and confiscation whitelist management.
//!
//! All three methods take one JSON object argument wrapping the list.

use crate::args::CallingConvention;
use crate::error::CoreError;
use crate::types::{
    BlacklistArgs, BlacklistResponse, ConfiscationTransaction, ConfiscationWhitelistArgs,
    ConfiscationWhitelistResponse, Fund,
};

use super::{decode_json, RpcMethod};

/// `addToConsensusBlacklist`
#[derive(Debug, Clone)]
pub struct AddToConsensusBlacklist {
    pub funds: Vec<Fund>,
}

impl RpcMethod for AddToConsensusBlacklist {
    const NAME: &'static str = "addToConsensusBlacklist";
    type Output = BlacklistResponse;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        CallingConvention::single(&BlacklistArgs {
            funds: self.funds.clone(),
        })
    }

    fn decode(result: serde_json::Value) -> Result<BlacklistResponse, CoreError> {
        decode_json(Self::NAME, result)
    }
}

/// `removeFromPolicyBlacklist`
#[derive(Debug, Clone)]
pub struct RemoveFromPolicyBlacklist {
    pub funds: Vec<Fund>,
}

impl RpcMethod for RemoveFromPolicyBlacklist {
    const NAME: &'static str = "removeFromPolicyBlacklist";
    type Output = BlacklistResponse;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        CallingConvention::single(&BlacklistArgs {
            funds: self.funds.clone(),
        })
    }

    fn decode(result: serde_json::Value) -> Result<BlacklistResponse, CoreError> {
        decode_json(Self::NAME, result)
    }
}

/// `addToConfiscationTxidWhitelist`
#[derive(Debug, Clone)]
pub struct AddToConfiscationTxidWhitelist {
    pub txs: Vec<ConfiscationTransaction>,
}

impl RpcMethod for AddToConfiscationTxidWhitelist {
    const NAME: &'static str = "addToConfiscationTxidWhitelist";
    type Output = ConfiscationWhitelistResponse;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        CallingConvention::single(&ConfiscationWhitelistArgs {
            confiscation_txs: self.txs.clone(),
        })
    }

    fn decode(result: serde_json::Value) -> Result<ConfiscationWhitelistResponse, CoreError> {
        decode_json(Self::NAME, result)
    }
}
