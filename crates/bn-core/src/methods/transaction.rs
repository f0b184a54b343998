//! Raw transaction creation, funding, signing and broadcast.

use bitcoin::hex::DisplayHex;
use bitcoin::{Address, Amount, Network, Transaction, TxOut, Txid};
use serde::{Deserialize, Serialize};

use crate::args::{CallingConvention, Positional};
use crate::error::CoreError;
use crate::types::{
    FundRawTransaction as FundedTx, PrevTx, SendRawTransactionsResponse, SignedRawTransaction,
    SigningError, Utxo,
};
use crate::wire::{btc_amount_json, tx_to_hex};

use super::{decode_json, decode_tx_hex, RpcMethod};

fn to_json<T: Serialize>(what: &str, value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value)
        .map_err(|e| CoreError::InvalidParams(format!("serialize {what}: {e}")))
}

// ==============================================================================
// createrawtransaction
// ==============================================================================

/// Outputs and locktime of a transaction to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRawTransactionParams {
    /// Outputs in order. Only P2PKH and P2SH scripts can be expressed, as
    /// the node takes them keyed by address.
    pub outputs: Vec<TxOut>,
    /// Payload for a single OP_RETURN output.
    pub data: Option<Vec<u8>>,
    pub locktime: Option<u32>,
}

impl CreateRawTransactionParams {
    /// The `{address: amount, "data": hex}` object. Addresses are rendered
    /// for `network`.
    fn outputs_json(&self, network: Network) -> Result<serde_json::Value, CoreError> {
        let mut outputs = serde_json::Map::new();
        for (idx, output) in self.outputs.iter().enumerate() {
            let script = output.script_pubkey.as_script();
            if !(script.is_p2pkh() || script.is_p2sh()) {
                return Err(CoreError::InvalidParams(format!(
                    "output {idx}: only P2PKH and P2SH outputs can be created by address"
                )));
            }
            let address = Address::from_script(script, network)
                .map_err(|e| CoreError::InvalidParams(format!("output {idx}: {e}")))?
                .to_string();
            if outputs
                .insert(address.clone(), btc_amount_json(output.value))
                .is_some()
            {
                return Err(CoreError::InvalidParams(format!(
                    "output {idx}: duplicate address {address}"
                )));
            }
        }
        if let Some(data) = &self.data {
            outputs.insert("data".to_owned(), data.to_lower_hex_string().into());
        }
        Ok(serde_json::Value::Object(outputs))
    }
}

/// `createrawtransaction`
#[derive(Debug, Clone)]
pub struct CreateRawTransaction {
    pub utxos: Vec<Utxo>,
    pub params: CreateRawTransactionParams,
    pub network: Network,
}

impl RpcMethod for CreateRawTransaction {
    const NAME: &'static str = "createrawtransaction";
    type Output = Transaction;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(Positional::new()
            .arg(to_json("utxos", &self.utxos)?)
            .arg(self.params.outputs_json(self.network)?)
            .opt(self.params.locktime)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<Transaction, CoreError> {
        let hex: String = decode_json(Self::NAME, result)?;
        decode_tx_hex(Self::NAME, &hex)
    }
}

// ==============================================================================
// fundrawtransaction
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FundRawTransactionOpts {
    #[serde(rename = "changeAddress", skip_serializing_if = "Option::is_none")]
    pub change_address: Option<String>,
    #[serde(rename = "changePosition", skip_serializing_if = "Option::is_none")]
    pub change_position: Option<u32>,
    #[serde(rename = "includeWatching", skip_serializing_if = "std::ops::Not::not")]
    pub include_watching: bool,
    #[serde(rename = "lockUnspents", skip_serializing_if = "std::ops::Not::not")]
    pub lock_unspents: bool,
    /// Fee rate per kilobyte.
    #[serde(
        rename = "feeRate",
        with = "bitcoin::amount::serde::as_btc::opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_rate: Option<Amount>,
    #[serde(
        rename = "subtractFeeFromOutputs",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub subtract_fee_from_outputs: Vec<u32>,
}

/// `fundrawtransaction`
#[derive(Debug, Clone)]
pub struct FundRawTransaction {
    pub tx: Transaction,
    pub opts: Option<FundRawTransactionOpts>,
}

#[derive(Deserialize)]
struct FundRawTransactionResult {
    hex: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    fee: Amount,
    changepos: i64,
}

impl RpcMethod for FundRawTransaction {
    const NAME: &'static str = "fundrawtransaction";
    type Output = FundedTx;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        let options = match &self.opts {
            Some(opts) => Some(to_json("fundrawtransaction options", opts)?),
            None => None,
        }
        .filter(|options| options.as_object().is_some_and(|o| !o.is_empty()));

        Ok(Positional::new()
            .arg(tx_to_hex(&self.tx))
            .opt(options)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<FundedTx, CoreError> {
        let raw: FundRawTransactionResult = decode_json(Self::NAME, result)?;
        Ok(FundedTx {
            tx: decode_tx_hex(Self::NAME, &raw.hex)?,
            fee: raw.fee,
            change_position: raw.changepos,
        })
    }
}

// ==============================================================================
// getrawtransaction
// ==============================================================================

/// `getrawtransaction` in verbose mode; only the `hex` field is used.
#[derive(Debug, Clone, Copy)]
pub struct GetRawTransaction {
    pub txid: Txid,
}

#[derive(Deserialize)]
struct VerboseTransaction {
    hex: String,
}

impl RpcMethod for GetRawTransaction {
    const NAME: &'static str = "getrawtransaction";
    type Output = Transaction;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        Ok(Positional::new()
            .arg(self.txid.to_string())
            .arg(true)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<Transaction, CoreError> {
        let raw: VerboseTransaction = decode_json(Self::NAME, result)?;
        decode_tx_hex(Self::NAME, &raw.hex)
    }
}

// ==============================================================================
// signrawtransaction
// ==============================================================================

/// Signature hash types accepted by the node. All carry `FORKID`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigHashType {
    #[default]
    All,
    None,
    Single,
    AllAnyoneCanPay,
    NoneAnyoneCanPay,
    SingleAnyoneCanPay,
}

impl SigHashType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL|FORKID",
            Self::None => "NONE|FORKID",
            Self::Single => "SINGLE|FORKID",
            Self::AllAnyoneCanPay => "ALL|FORKID|ANYONECANPAY",
            Self::NoneAnyoneCanPay => "NONE|FORKID|ANYONECANPAY",
            Self::SingleAnyoneCanPay => "SINGLE|FORKID|ANYONECANPAY",
        }
    }
}

impl std::fmt::Display for SigHashType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignRawTransactionOpts {
    pub prev_txs: Vec<PrevTx>,
    /// WIF-encoded keys. When empty the node signs with its wallet.
    pub private_keys: Vec<String>,
    pub sighash_type: Option<SigHashType>,
}

/// `signrawtransaction`
#[derive(Debug, Clone)]
pub struct SignRawTransaction {
    pub tx: Transaction,
    pub opts: Option<SignRawTransactionOpts>,
}

#[derive(Deserialize)]
struct SignRawTransactionResult {
    hex: String,
    complete: bool,
    #[serde(default)]
    errors: Vec<SigningError>,
}

impl RpcMethod for SignRawTransaction {
    const NAME: &'static str = "signrawtransaction";
    type Output = SignedRawTransaction;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        let opts = self.opts.clone().unwrap_or_default();
        let prev_txs = if opts.prev_txs.is_empty() {
            None
        } else {
            Some(to_json("prevtxs", &opts.prev_txs)?)
        };
        let private_keys = (!opts.private_keys.is_empty()).then(|| opts.private_keys.clone());

        Ok(Positional::new()
            .arg(tx_to_hex(&self.tx))
            .opt(prev_txs)
            .opt(private_keys)
            .opt(opts.sighash_type.map(SigHashType::as_str))
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<SignedRawTransaction, CoreError> {
        let raw: SignRawTransactionResult = decode_json(Self::NAME, result)?;
        Ok(SignedRawTransaction {
            tx: decode_tx_hex(Self::NAME, &raw.hex)?,
            complete: raw.complete,
            errors: raw.errors,
        })
    }
}

// ==============================================================================
// sendrawtransaction
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendRawTransactionOpts {
    pub allow_high_fees: bool,
    pub dont_check_fee: bool,
}

/// `sendrawtransaction`
#[derive(Debug, Clone)]
pub struct SendRawTransaction {
    pub tx: Transaction,
    pub opts: Option<SendRawTransactionOpts>,
}

impl RpcMethod for SendRawTransaction {
    const NAME: &'static str = "sendrawtransaction";
    /// Txid as reported by the node.
    type Output = String;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        let opts = self.opts.unwrap_or_default();
        // The node reads both flags with a strict bool check, so a gap is
        // padded with `false`, not `null`.
        Ok(Positional::new()
            .arg(tx_to_hex(&self.tx))
            .opt_or(opts.allow_high_fees.then_some(true), false)
            .opt_or(opts.dont_check_fee.then_some(true), false)
            .into())
    }

    fn decode(result: serde_json::Value) -> Result<String, CoreError> {
        decode_json(Self::NAME, result)
    }
}

// ==============================================================================
// sendrawtransactions
// ==============================================================================

/// One transaction in a `sendrawtransactions` batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRawTransactionsParams {
    pub tx: Transaction,
    pub allow_high_fees: bool,
    pub dont_check_fee: bool,
    pub list_unconfirmed_ancestors: bool,
}

impl SendRawTransactionsParams {
    pub fn new(tx: Transaction) -> Self {
        Self {
            tx,
            allow_high_fees: false,
            dont_check_fee: false,
            list_unconfirmed_ancestors: false,
        }
    }
}

impl Serialize for SendRawTransactionsParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry {
            hex: String,
            #[serde(skip_serializing_if = "std::ops::Not::not")]
            allowhighfees: bool,
            #[serde(skip_serializing_if = "std::ops::Not::not")]
            dontcheckfee: bool,
            #[serde(skip_serializing_if = "std::ops::Not::not")]
            listunconfirmedancestors: bool,
        }

        Entry {
            hex: tx_to_hex(&self.tx),
            allowhighfees: self.allow_high_fees,
            dontcheckfee: self.dont_check_fee,
            listunconfirmedancestors: self.list_unconfirmed_ancestors,
        }
        .serialize(serializer)
    }
}

/// `sendrawtransactions`
#[derive(Debug, Clone)]
pub struct SendRawTransactions {
    pub txs: Vec<SendRawTransactionsParams>,
}

impl RpcMethod for SendRawTransactions {
    const NAME: &'static str = "sendrawtransactions";
    type Output = SendRawTransactionsResponse;

    fn build_args(&self) -> Result<CallingConvention, CoreError> {
        if self.txs.is_empty() {
            return Err(CoreError::InvalidParams(
                "sendrawtransactions needs at least one transaction".to_owned(),
            ));
        }
        CallingConvention::single(&self.txs)
    }

    fn decode(result: serde_json::Value) -> Result<SendRawTransactionsResponse, CoreError> {
        // An all-accepted batch may come back as `null` rather than `{}`.
        if result.is_null() {
            return Ok(SendRawTransactionsResponse::default());
        }
        decode_json(Self::NAME, result)
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::hashes::Hash;
    use bitcoin::{ScriptBuf, ScriptHash};
    use serde_json::json;

    use super::*;
    use crate::test_util::{sample_p2pkh_script, sample_tx, txid_from_byte, SAMPLE_TX_HEX};

    fn sample_utxo() -> Utxo {
        Utxo {
            txid: txid_from_byte(1),
            vout: 0,
            script_pub_key: sample_p2pkh_script(),
            amount: Amount::from_sat(10_000),
        }
    }

    fn params_of<M: RpcMethod>(method: &M) -> Vec<serde_json::Value> {
        method.build_args().expect("args must build").into_params()
    }

    #[test]
    fn create_raw_transaction_mainnet_golden_args() {
        let method = CreateRawTransaction {
            utxos: vec![sample_utxo()],
            params: CreateRawTransactionParams {
                outputs: vec![TxOut {
                    value: Amount::from_sat(9_000),
                    script_pubkey: sample_p2pkh_script(),
                }],
                data: None,
                locktime: None,
            },
            network: Network::Bitcoin,
        };
        assert_eq!(
            params_of(&method),
            vec![
                json!([{
                    "txid": txid_from_byte(1).to_string(),
                    "vout": 0,
                    "scriptPubKey": sample_p2pkh_script().to_hex_string(),
                    "amount": 0.0001
                }]),
                json!({ "12ZEw5Hcv1hTb6YUQJ69y1V7uhcoDz92PH": 0.00009 }),
            ]
        );
    }

    #[test]
    fn create_raw_transaction_testnet_address_and_locktime() {
        let method = CreateRawTransaction {
            utxos: Vec::new(),
            params: CreateRawTransactionParams {
                outputs: vec![TxOut {
                    value: Amount::from_sat(100_000_000),
                    script_pubkey: sample_p2pkh_script(),
                }],
                data: Some(vec![0xde, 0xad]),
                locktime: Some(500),
            },
            network: Network::Testnet,
        };
        assert_eq!(
            params_of(&method),
            vec![
                json!([]),
                json!({ "mh5CE8Nbj38iND267s4XnvhSmhDW7yWc6Q": 1.0, "data": "dead" }),
                json!(500),
            ]
        );
    }

    #[test]
    fn create_raw_transaction_keeps_output_order() {
        let method = CreateRawTransaction {
            utxos: Vec::new(),
            params: CreateRawTransactionParams {
                outputs: vec![
                    TxOut {
                        value: Amount::from_sat(1),
                        script_pubkey: sample_p2pkh_script(),
                    },
                    TxOut {
                        value: Amount::from_sat(2),
                        script_pubkey: ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(
                            [0x22; 20],
                        )),
                    },
                ],
                data: None,
                locktime: None,
            },
            network: Network::Bitcoin,
        };
        let params = params_of(&method);
        let keys: Vec<&String> = params[1]
            .as_object()
            .expect("outputs object")
            .keys()
            .collect();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].starts_with('1'));
        assert!(keys[1].starts_with('3'));
    }

    #[test]
    fn create_raw_transaction_rejects_duplicate_address() {
        let output = TxOut {
            value: Amount::from_sat(1),
            script_pubkey: sample_p2pkh_script(),
        };
        let method = CreateRawTransaction {
            utxos: Vec::new(),
            params: CreateRawTransactionParams {
                outputs: vec![output.clone(), output],
                ..Default::default()
            },
            network: Network::Bitcoin,
        };
        let err = method.build_args().expect_err("must reject");
        assert!(err.to_string().contains("duplicate address"));
    }

    #[test]
    fn create_raw_transaction_rejects_unaddressable_script() {
        let method = CreateRawTransaction {
            utxos: Vec::new(),
            params: CreateRawTransactionParams {
                outputs: vec![TxOut {
                    value: Amount::from_sat(1),
                    script_pubkey: ScriptBuf::from_bytes(vec![0x51]),
                }],
                ..Default::default()
            },
            network: Network::Bitcoin,
        };
        assert!(matches!(
            method.build_args(),
            Err(CoreError::InvalidParams(_))
        ));
    }

    #[test]
    fn create_raw_transaction_decodes_hex_result() {
        let tx = CreateRawTransaction::decode(json!(SAMPLE_TX_HEX)).expect("should decode");
        assert_eq!(tx, sample_tx());
    }

    #[test]
    fn create_raw_transaction_attributes_failures() {
        let json_err = CreateRawTransaction::decode(json!({"hex": SAMPLE_TX_HEX}))
            .expect_err("object is not a string");
        assert!(matches!(json_err, CoreError::Decode { .. }));

        let wire_err = CreateRawTransaction::decode(json!("0100")).expect_err("truncated tx");
        assert!(matches!(
            wire_err,
            CoreError::InvalidTxData(ref m) if m.contains("createrawtransaction")
        ));
    }

    #[test]
    fn fund_raw_transaction_without_opts_sends_only_hex() {
        let method = FundRawTransaction {
            tx: sample_tx(),
            opts: None,
        };
        assert_eq!(params_of(&method), vec![json!(SAMPLE_TX_HEX)]);

        let empty_opts = FundRawTransaction {
            tx: sample_tx(),
            opts: Some(FundRawTransactionOpts::default()),
        };
        assert_eq!(params_of(&empty_opts), vec![json!(SAMPLE_TX_HEX)]);
    }

    #[test]
    fn fund_raw_transaction_options_object() {
        let method = FundRawTransaction {
            tx: sample_tx(),
            opts: Some(FundRawTransactionOpts {
                change_address: Some("12ZEw5Hcv1hTb6YUQJ69y1V7uhcoDz92PH".to_owned()),
                lock_unspents: true,
                fee_rate: Some(Amount::from_sat(500)),
                subtract_fee_from_outputs: vec![0],
                ..Default::default()
            }),
        };
        assert_eq!(
            params_of(&method),
            vec![
                json!(SAMPLE_TX_HEX),
                json!({
                    "changeAddress": "12ZEw5Hcv1hTb6YUQJ69y1V7uhcoDz92PH",
                    "lockUnspents": true,
                    "feeRate": 0.000005,
                    "subtractFeeFromOutputs": [0]
                }),
            ]
        );
    }

    #[test]
    fn fund_raw_transaction_decodes_fee_and_change() {
        let funded = FundRawTransaction::decode(json!({
            "hex": SAMPLE_TX_HEX,
            "fee": 0.00000226,
            "changepos": 1
        }))
        .expect("should decode");
        assert_eq!(funded.tx, sample_tx());
        assert_eq!(funded.fee, Amount::from_sat(226));
        assert_eq!(funded.change_position, 1);
    }

    #[test]
    fn get_raw_transaction_asks_for_verbose() {
        let method = GetRawTransaction {
            txid: txid_from_byte(7),
        };
        assert_eq!(
            params_of(&method),
            vec![json!(txid_from_byte(7).to_string()), json!(true)]
        );
    }

    #[test]
    fn get_raw_transaction_reads_hex_field() {
        let tx = GetRawTransaction::decode(json!({
            "txid": "ignored",
            "hex": SAMPLE_TX_HEX,
            "confirmations": 3
        }))
        .expect("should decode");
        assert_eq!(tx, sample_tx());
    }

    #[test]
    fn sign_raw_transaction_without_opts() {
        let method = SignRawTransaction {
            tx: sample_tx(),
            opts: None,
        };
        assert_eq!(params_of(&method), vec![json!(SAMPLE_TX_HEX)]);
    }

    #[test]
    fn sign_raw_transaction_pads_missing_prevtxs_with_null() {
        const WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
        let method = SignRawTransaction {
            tx: sample_tx(),
            opts: Some(SignRawTransactionOpts {
                prev_txs: Vec::new(),
                private_keys: vec![WIF.to_owned()],
                sighash_type: Some(SigHashType::AllAnyoneCanPay),
            }),
        };
        assert_eq!(
            params_of(&method),
            vec![
                json!(SAMPLE_TX_HEX),
                json!(null),
                json!([WIF]),
                json!("ALL|FORKID|ANYONECANPAY"),
            ]
        );
    }

    #[test]
    fn sign_raw_transaction_sends_prevtxs() {
        let method = SignRawTransaction {
            tx: sample_tx(),
            opts: Some(SignRawTransactionOpts {
                prev_txs: vec![sample_utxo().into()],
                ..Default::default()
            }),
        };
        let params = params_of(&method);
        assert_eq!(params.len(), 2);
        assert_eq!(params[1][0]["vout"], json!(0));
        assert_eq!(params[1][0]["amount"], json!(0.0001));
        assert!(params[1][0].get("redeemScript").is_none());
    }

    #[test]
    fn sign_raw_transaction_decodes_errors() {
        let signed = SignRawTransaction::decode(json!({
            "hex": SAMPLE_TX_HEX,
            "complete": false,
            "errors": [{
                "txid": txid_from_byte(1).to_string(),
                "vout": 0,
                "scriptSig": "",
                "sequence": 4294967295u32,
                "error": "Operation not valid with the current stack size"
            }]
        }))
        .expect("should decode");
        assert!(!signed.complete);
        assert_eq!(signed.errors.len(), 1);
        assert_eq!(signed.errors[0].txid, txid_from_byte(1));
    }

    #[test]
    fn send_raw_transaction_without_opts_sends_only_hex() {
        let method = SendRawTransaction {
            tx: sample_tx(),
            opts: None,
        };
        assert_eq!(params_of(&method), vec![json!(SAMPLE_TX_HEX)]);
    }

    #[test]
    fn send_raw_transaction_pads_allowhighfees_with_false() {
        let method = SendRawTransaction {
            tx: sample_tx(),
            opts: Some(SendRawTransactionOpts {
                allow_high_fees: false,
                dont_check_fee: true,
            }),
        };
        assert_eq!(
            params_of(&method),
            vec![json!(SAMPLE_TX_HEX), json!(false), json!(true)]
        );
    }

    #[test]
    fn send_raw_transaction_returns_txid_string() {
        let txid = SendRawTransaction::decode(json!("abc123")).expect("should decode");
        assert_eq!(txid, "abc123");
    }

    #[test]
    fn send_raw_transactions_single_array_argument() {
        let mut second = SendRawTransactionsParams::new(sample_tx());
        second.dont_check_fee = true;
        second.list_unconfirmed_ancestors = true;
        let method = SendRawTransactions {
            txs: vec![SendRawTransactionsParams::new(sample_tx()), second],
        };
        assert_eq!(
            params_of(&method),
            vec![json!([
                { "hex": SAMPLE_TX_HEX },
                { "hex": SAMPLE_TX_HEX, "dontcheckfee": true, "listunconfirmedancestors": true }
            ])]
        );
    }

    #[test]
    fn send_raw_transactions_rejects_empty_batch() {
        let method = SendRawTransactions { txs: Vec::new() };
        assert!(matches!(
            method.build_args(),
            Err(CoreError::InvalidParams(_))
        ));
    }

    #[test]
    fn send_raw_transactions_decodes_invalid_entries() {
        let resp = SendRawTransactions::decode(json!({
            "invalid": [{
                "txid": txid_from_byte(2).to_string(),
                "reject_code": 16,
                "reject_reason": "bad-txns-inputs-missingorspent"
            }]
        }))
        .expect("should decode");
        assert_eq!(resp.invalid.len(), 1);
        assert_eq!(resp.invalid[0].reject_code, 16);
        assert!(resp.known.is_empty());

        let accepted = SendRawTransactions::decode(serde_json::Value::Null).expect("null ok");
        assert_eq!(accepted, SendRawTransactionsResponse::default());
    }
}
