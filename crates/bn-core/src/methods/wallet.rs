//! Wallet queries and payments.

use bitcoin::{Amount, SignedAmount};

use crate::args::{CallingConvention, Positional};
use crate::error::CoreError;
use crate::types::{UnspentOutput, WalletInfo};
use crate::wire::{btc_amount_json, parse_btc_signed_amount};

use super::{decode_json, RpcMethod};

/// Node default for `listunspent`'s `maxconf`.
const LIST_UNSPENT_MAX_CONF: u32 = 9_999_999;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetBalanceOpts {
    /// Legacy account name; the node's `"*"` (all accounts) when unset.
    pub account: Option<String>,
    pub min_conf: Option<u32>,
    pub include_watch_only: bool,
}

/// `getbalance`
#[derive(Debug, Clone, Default)]
pub struct GetBalance {
    pub opts: GetBalanceOpts,
}

impl RpcMethod for GetBalance {
    const NAME: &'static str = "getbalance";
    /// Signed: a legacy account can be overdrawn by `move`.
    type Output = SignedAmount;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        let opts = &self.opts;
        Ok(Positional::new()
            .opt_or(opts.account.clone(), "*")
            .opt_or(opts.min_conf, 1)
            .opt_or(opts.include_watch_only.then_some(true), false)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<SignedAmount, CoreError> {
        parse_btc_signed_amount(Self::NAME, &result)
    }
}

/// `getunconfirmedbalance`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetUnconfirmedBalance;

impl RpcMethod for GetUnconfirmedBalance {
    const NAME: &'static str = "getunconfirmedbalance";
    type Output = SignedAmount;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(CallingConvention::none())
    }

    fn decode(result: serde_json::Value) -> Result<SignedAmount, CoreError> {
        parse_btc_signed_amount(Self::NAME, &result)
    }
}

/// `getnewaddress`
#[derive(Debug, Clone, Default)]
pub struct GetNewAddress {
    pub account: Option<String>,
}

impl RpcMethod for GetNewAddress {
    const NAME: &'static str = "getnewaddress";
    type Output = String;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(Positional::new().opt(self.account.clone()).into())
    }

    fn decode(result: serde_json::Value) -> Result<String, CoreError> {
        decode_json(Self::NAME, result)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUnspentOpts {
    pub min_conf: Option<u32>,
    pub max_conf: Option<u32>,
    /// Restrict to these addresses; all wallet addresses when empty.
    pub addresses: Vec<String>,
}

/// `listunspent`
#[derive(Debug, Clone, Default)]
pub struct ListUnspent {
    pub opts: ListUnspentOpts,
}

impl RpcMethod for ListUnspent {
    const NAME: &'static str = "listunspent";
    type Output = Vec<UnspentOutput>;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        let opts = &self.opts;
        let addresses = (!opts.addresses.is_empty()).then(|| opts.addresses.clone());
        Ok(Positional::new()
            .opt_or(opts.min_conf, 1)
            .opt_or(opts.max_conf, LIST_UNSPENT_MAX_CONF)
            .opt(addresses)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<Vec<UnspentOutput>, CoreError> {
        decode_json(Self::NAME, result)
    }
}

/// `dumpprivkey`
#[derive(Debug, Clone)]
pub struct DumpPrivKey {
    pub address: String,
}

impl RpcMethod for DumpPrivKey {
    const NAME: &'static str = "dumpprivkey";
    /// WIF-encoded private key.
    type Output = String;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(Positional::new().arg(self.address.clone()).into())
    }

    fn decode(result: serde_json::Value) -> Result<String, CoreError> {
        decode_json(Self::NAME, result)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendToAddressOpts {
    pub comment: Option<String>,
    pub comment_to: Option<String>,
    pub subtract_fee_from_amount: bool,
}

/// `sendtoaddress`
#[derive(Debug, Clone)]
pub struct SendToAddress {
    pub address: String,
    pub amount: Amount,
    pub opts: SendToAddressOpts,
}

impl RpcMethod for SendToAddress {
    const NAME: &'static str = "sendtoaddress";
    type Output = String;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        if self.amount == Amount::ZERO {
            return Err(CoreError::InvalidParams(
                "sendtoaddress amount must be positive".to_owned(),
            ));
        }
        let opts = &self.opts;
        Ok(Positional::new()
            .arg(self.address.clone())
            .arg(btc_amount_json(self.amount))
            .opt_or(opts.comment.clone(), "")
            .opt_or(opts.comment_to.clone(), "")
            .opt_or(opts.subtract_fee_from_amount.then_some(true), false)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<String, CoreError> {
        decode_json(Self::NAME, result)
    }
}

/// `getwalletinfo`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetWalletInfo;

impl RpcMethod for GetWalletInfo {
    const NAME: &'static str = "getwalletinfo";
    type Output = WalletInfo;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(CallingConvention::none())
    }

    fn decode(result: serde_json::Value) -> Result<WalletInfo, CoreError> {
        decode_json(Self::NAME, result)
    }
}
