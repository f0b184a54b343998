use std::future::Future;
use std::sync::Arc;

use bitcoin::{Amount, Network, SignedAmount, Transaction, Txid};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::methods::blacklist::{
    AddToConfiscationTxidWhitelist, AddToConsensusBlacklist, RemoveFromPolicyBlacklist,
};
use crate::methods::chain::GetBlockchainInfo;
use crate::methods::transaction::{
    CreateRawTransaction, CreateRawTransactionParams, FundRawTransaction,
    FundRawTransactionOpts, GetRawTransaction, SendRawTransaction, SendRawTransactionOpts,
    SendRawTransactions, SendRawTransactionsParams, SignRawTransaction, SignRawTransactionOpts,
};
use crate::methods::wallet::{
    DumpPrivKey, GetBalance, GetBalanceOpts, GetNewAddress, GetUnconfirmedBalance,
    GetWalletInfo, ListUnspent, ListUnspentOpts, SendToAddress, SendToAddressOpts,
};
use crate::methods::RpcMethod;
use crate::rpc::{HttpTransport, RpcInvoker, Transport};
use crate::types::{
    BlacklistResponse, ChainInfo, ConfiscationTransaction, ConfiscationWhitelistResponse,
    FundRawTransaction as FundedTx, Fund, SendRawTransactionsResponse, SignedRawTransaction,
    UnspentOutput, Utxo, WalletInfo,
};

/// Typed client for a Bitcoin SV node.
///
/// Each method is one JSON-RPC round trip; errors are returned exactly as
/// the transport or node produced them. The client is `Send + Sync` and can
/// be shared behind an `Arc`.
pub struct NodeClient {
    invoker: RpcInvoker,
    network: Network,
}

impl NodeClient {
    /// Client over HTTP(S) using `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.network))
    }

    /// Client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, network: Network) -> Self {
        Self {
            invoker: RpcInvoker::new(transport),
            network,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub async fn call<M: RpcMethod>(&self, method: &M) -> Result<M::Output, CoreError> {
        self.invoker.call(method).await
    }

    pub async fn call_cancellable<M, C>(
        &self,
        method: &M,
        cancel: C,
    ) -> Result<M::Output, CoreError>
    where
        M: RpcMethod,
        C: Future<Output = ()>,
    {
        self.invoker.call_cancellable(method, cancel).await
    }

    /// Untyped call for methods without a typed wrapper.
    pub async fn invoke(
        &self,
        method: &str,
        params: &[serde_json::Value],
    ) -> Result<serde_json::Value, CoreError> {
        self.invoker.invoke(method, params).await
    }

    // ==========================================================================
    // Transactions
    // ==========================================================================

    pub async fn create_raw_transaction(
        &self,
        utxos: Vec<Utxo>,
        params: CreateRawTransactionParams,
    ) -> Result<Transaction, CoreError> {
        self.call(&CreateRawTransaction {
            utxos,
            params,
            network: self.network,
        })
        .await
    }

    pub async fn fund_raw_transaction(
        &self,
        tx: &Transaction,
        opts: Option<FundRawTransactionOpts>,
    ) -> Result<FundedTx, CoreError> {
        self.call(&FundRawTransaction {
            tx: tx.clone(),
            opts,
        })
        .await
    }

    pub async fn raw_transaction(&self, txid: &Txid) -> Result<Transaction, CoreError> {
        self.call(&GetRawTransaction { txid: *txid }).await
    }

    pub async fn sign_raw_transaction(
        &self,
        tx: &Transaction,
        opts: Option<SignRawTransactionOpts>,
    ) -> Result<SignedRawTransaction, CoreError> {
        self.call(&SignRawTransaction {
            tx: tx.clone(),
            opts,
        })
        .await
    }

    /// Broadcast one transaction. Not safe to blindly retry: on a transport
    /// failure the node may already have accepted it.
    pub async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        opts: Option<SendRawTransactionOpts>,
    ) -> Result<String, CoreError> {
        self.call(&SendRawTransaction {
            tx: tx.clone(),
            opts,
        })
        .await
    }

    pub async fn send_raw_transactions(
        &self,
        txs: Vec<SendRawTransactionsParams>,
    ) -> Result<SendRawTransactionsResponse, CoreError> {
        self.call(&SendRawTransactions { txs }).await
    }

    // ==========================================================================
    // Blacklists
    // ==========================================================================

    pub async fn add_to_consensus_blacklist(
        &self,
        funds: Vec<Fund>,
    ) -> Result<BlacklistResponse, CoreError> {
        self.call(&AddToConsensusBlacklist { funds }).await
    }

    pub async fn remove_from_policy_blacklist(
        &self,
        funds: Vec<Fund>,
    ) -> Result<BlacklistResponse, CoreError> {
        self.call(&RemoveFromPolicyBlacklist { funds }).await
    }

    pub async fn add_to_confiscation_transaction_whitelist(
        &self,
        txs: Vec<ConfiscationTransaction>,
    ) -> Result<ConfiscationWhitelistResponse, CoreError> {
        self.call(&AddToConfiscationTxidWhitelist { txs }).await
    }

    // ==========================================================================
    // Wallet
    // ==========================================================================

    pub async fn balance(&self, opts: GetBalanceOpts) -> Result<SignedAmount, CoreError> {
        self.call(&GetBalance { opts }).await
    }

    pub async fn unconfirmed_balance(&self) -> Result<SignedAmount, CoreError> {
        self.call(&GetUnconfirmedBalance).await
    }

    pub async fn new_address(&self, account: Option<String>) -> Result<String, CoreError> {
        self.call(&GetNewAddress { account }).await
    }

    pub async fn list_unspent(
        &self,
        opts: ListUnspentOpts,
    ) -> Result<Vec<UnspentOutput>, CoreError> {
        self.call(&ListUnspent { opts }).await
    }

    pub async fn dump_private_key(&self, address: &str) -> Result<String, CoreError> {
        self.call(&DumpPrivKey {
            address: address.to_owned(),
        })
        .await
    }

    pub async fn send_to_address(
        &self,
        address: &str,
        amount: Amount,
        opts: SendToAddressOpts,
    ) -> Result<String, CoreError> {
        self.call(&SendToAddress {
            address: address.to_owned(),
            amount,
            opts,
        })
        .await
    }

    pub async fn wallet_info(&self) -> Result<WalletInfo, CoreError> {
        self.call(&GetWalletInfo).await
    }

    // ==========================================================================
    // Chain
    // ==========================================================================

    pub async fn blockchain_info(&self) -> Result<ChainInfo, CoreError> {
        self.call(&GetBlockchainInfo).await
    }
}
