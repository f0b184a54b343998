use std::path::PathBuf;

use bitcoin::{Network, Txid};
use clap::{Parser, Subcommand, ValueEnum};

/// Talk to a Bitcoin SV node over JSON-RPC.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC URL.
    #[arg(long, default_value = "http://127.0.0.1:8332", env = "BN_RPC_URL")]
    pub rpc_url: String,

    /// RPC username.
    #[arg(long, env = "BN_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password.
    #[arg(long, env = "BN_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Node cookie file, used when no username/password is given.
    #[arg(long, env = "BN_RPC_COOKIE")]
    pub rpc_cookie: Option<PathBuf>,

    /// Network used to render output addresses.
    #[arg(long, value_enum, default_value = "mainnet", env = "BN_NETWORK")]
    pub network: NetworkArg,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NetworkArg {
    Mainnet,
    Testnet,
    Regtest,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Bitcoin,
            NetworkArg::Testnet => Network::Testnet,
            NetworkArg::Regtest => Network::Regtest,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show chain info.
    Info,

    /// Call any method with JSON-encoded positional parameters.
    Call {
        method: String,
        /// Each parameter as JSON; bare words are sent as strings.
        params: Vec<String>,
    },

    /// Fetch a transaction and print its wire hex.
    GetRawTx { txid: Txid },

    /// Broadcast a transaction given as wire hex.
    SendRawTx {
        hex: String,
        #[arg(long)]
        allow_high_fees: bool,
        #[arg(long)]
        dont_check_fee: bool,
    },

    /// Freeze outputs on the consensus blacklist.
    BlacklistAdd {
        /// Output to freeze as `txid:vout` (repeatable).
        #[arg(long = "fund", required = true)]
        funds: Vec<String>,
        /// Enforcement window as `start:stop` or `start:` (repeatable;
        /// applied to every fund).
        #[arg(long = "enforce")]
        enforce: Vec<String>,
        #[arg(long)]
        policy_expires_with_consensus: bool,
    },

    /// Unfreeze outputs on the policy blacklist.
    BlacklistRemove {
        /// Output to unfreeze as `txid:vout` (repeatable).
        #[arg(long = "fund", required = true)]
        funds: Vec<String>,
    },

    /// Show wallet balance.
    Balance {
        #[arg(long)]
        minconf: Option<u32>,
    },

    /// List wallet unspent outputs.
    ListUnspent {
        #[arg(long)]
        minconf: Option<u32>,
    },

    /// Generate a new wallet address.
    NewAddress,
}
