mod cli;

use std::time::Duration;

use bitcoin::Txid;
use clap::Parser;
use eyre::{bail, eyre, WrapErr};
use serde_json::Value;

use bn_core::methods::transaction::SendRawTransactionOpts;
use bn_core::methods::wallet::{GetBalanceOpts, ListUnspentOpts};
use bn_core::types::Fund;
use bn_core::{ClientConfig, CoreError, NodeClient, TransportError};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let mut config = ClientConfig::default()
        .with_endpoint(args.rpc_url.clone())
        .with_network(args.network.into())
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    config.user = args.rpc_user.clone();
    config.pass = args.rpc_pass.clone();
    config.cookie_file = args.rpc_cookie.clone();

    let client = NodeClient::new(&config).context("configure node client")?;
    tracing::debug!(endpoint = %args.rpc_url, network = %client.network(), "client ready");

    let output = tokio::select! {
        result = run(&client, args.command) => result.map_err(|err| {
            let err = match rpc_error_hint(&args.rpc_url, &err) {
                Some(hint) => err.wrap_err(hint),
                None => err,
            };
            err.wrap_err("node request failed")
        })?,
        _ = tokio::signal::ctrl_c() => bail!("interrupted"),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render output")?
    );
    Ok(())
}

async fn run(client: &NodeClient, command: Command) -> eyre::Result<Value> {
    let output = match command {
        Command::Info => serde_json::to_value(client.blockchain_info().await?)?,
        Command::Call { method, params } => {
            let params: Vec<Value> = params.iter().map(|p| parse_param(p)).collect();
            client.invoke(&method, &params).await?
        }
        Command::GetRawTx { txid } => {
            let tx = client.raw_transaction(&txid).await?;
            Value::String(bn_core::wire::tx_to_hex(&tx))
        }
        Command::SendRawTx {
            hex,
            allow_high_fees,
            dont_check_fee,
        } => {
            let tx = bn_core::wire::tx_from_hex(&hex)?;
            let opts = SendRawTransactionOpts {
                allow_high_fees,
                dont_check_fee,
            };
            Value::String(client.send_raw_transaction(&tx, Some(opts)).await?)
        }
        Command::BlacklistAdd {
            funds,
            enforce,
            policy_expires_with_consensus,
        } => {
            let windows = enforce
                .iter()
                .map(|w| parse_enforce(w))
                .collect::<eyre::Result<Vec<_>>>()?;
            let funds = funds
                .iter()
                .map(|f| {
                    let mut fund = parse_fund(f)?;
                    for (start, stop) in &windows {
                        fund = fund.enforced(*start, *stop);
                    }
                    if policy_expires_with_consensus {
                        fund = fund.policy_expires_with_consensus();
                    }
                    Ok(fund)
                })
                .collect::<eyre::Result<Vec<_>>>()?;
            serde_json::to_value(client.add_to_consensus_blacklist(funds).await?)?
        }
        Command::BlacklistRemove { funds } => {
            let funds = funds
                .iter()
                .map(|f| parse_fund(f))
                .collect::<eyre::Result<Vec<_>>>()?;
            serde_json::to_value(client.remove_from_policy_blacklist(funds).await?)?
        }
        Command::Balance { minconf } => {
            let opts = GetBalanceOpts {
                min_conf: minconf,
                ..Default::default()
            };
            let balance = client.balance(opts).await?;
            serde_json::json!(balance.to_btc())
        }
        Command::ListUnspent { minconf } => {
            let opts = ListUnspentOpts {
                min_conf: minconf,
                ..Default::default()
            };
            serde_json::to_value(client.list_unspent(opts).await?)?
        }
        Command::NewAddress => Value::String(client.new_address(None).await?),
    };
    Ok(output)
}

/// A parameter is sent as JSON when it parses as JSON, otherwise as a
/// plain string, so `bn call getblock 0000...` works without quoting.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn parse_fund(raw: &str) -> eyre::Result<Fund> {
    let (txid, vout) = raw
        .split_once(':')
        .ok_or_else(|| eyre!("fund `{raw}` must be `txid:vout`"))?;
    let txid: Txid = txid
        .parse()
        .wrap_err_with(|| format!("invalid txid in fund `{raw}`"))?;
    let vout: u32 = vout
        .parse()
        .wrap_err_with(|| format!("invalid vout in fund `{raw}`"))?;
    Ok(Fund::new(txid, vout))
}

fn parse_enforce(raw: &str) -> eyre::Result<(u32, Option<u32>)> {
    let (start, stop) = raw
        .split_once(':')
        .ok_or_else(|| eyre!("enforcement window `{raw}` must be `start:stop` or `start:`"))?;
    let start: u32 = start
        .parse()
        .wrap_err_with(|| format!("invalid start height in `{raw}`"))?;
    let stop = match stop {
        "" => None,
        stop => Some(
            stop.parse::<u32>()
                .wrap_err_with(|| format!("invalid stop height in `{raw}`"))?,
        ),
    };
    if stop.is_some_and(|stop| stop <= start) {
        bail!("enforcement window `{raw}` must end after it starts");
    }
    Ok((start, stop))
}

/// A hint for common misconfigurations, attached as context so the
/// underlying error chain is still printed.
fn rpc_error_hint(rpc_url: &str, err: &eyre::Report) -> Option<String> {
    let hint = match err.downcast_ref::<CoreError>()? {
        CoreError::Transport(TransportError::Status { status: 401 | 403 }) => {
            "authentication failed; verify --rpc-user/--rpc-pass or --rpc-cookie".to_owned()
        }
        CoreError::Transport(TransportError::Status { status: 404 }) => {
            format!("endpoint path is invalid; verify `{rpc_url}`")
        }
        CoreError::Transport(TransportError::Status {
            status: 502 | 503 | 504,
        }) => format!("a proxy in front of `{rpc_url}` could not reach the node"),
        CoreError::Transport(TransportError::Connect(_)) => format!(
            "could not reach `{rpc_url}`; verify the node is running and rpcallowip permits this host"
        ),
        CoreError::Rpc { code: -32601, .. } => "the node does not know this method".to_owned(),
        _ => return None,
    };
    Some(format!("hint: {hint}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "bfed856c469f4b115a56fad10486a6082ffa7e845f058db542973bca6fefeaff";

    #[test]
    fn parse_param_prefers_json() {
        assert_eq!(parse_param("true"), Value::Bool(true));
        assert_eq!(parse_param("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(parse_param("abc"), Value::String("abc".into()));
    }

    #[test]
    fn parse_fund_reads_txid_and_vout() {
        let fund = parse_fund(&format!("{TXID}:3")).expect("should parse");
        assert_eq!(fund.tx_id.to_string(), TXID);
        assert_eq!(fund.vout, 3);
        assert!(fund.enforce_at_height.is_empty());
    }

    #[test]
    fn parse_fund_rejects_missing_vout() {
        assert!(parse_fund(TXID).is_err());
        assert!(parse_fund(&format!("{TXID}:x")).is_err());
    }

    #[test]
    fn parse_enforce_windows() {
        assert_eq!(parse_enforce("100:200").expect("closed"), (100, Some(200)));
        assert_eq!(parse_enforce("100:").expect("open"), (100, None));
        assert!(parse_enforce("200:100").is_err());
        assert!(parse_enforce("100").is_err());
    }

    #[test]
    fn rpc_error_hint_for_auth_failure() {
        let err = eyre::Report::new(CoreError::Transport(TransportError::Status {
            status: 401,
        }));
        let hint = rpc_error_hint("http://127.0.0.1:8332", &err).expect("401 has a hint");
        assert!(hint.contains("authentication failed"));

        let wrapped = err.wrap_err(hint).wrap_err("node request failed");
        assert_eq!(
            wrapped.root_cause().to_string(),
            "node replied with HTTP 401 and no body"
        );
        assert!(wrapped.downcast_ref::<CoreError>().is_some());
    }

    #[test]
    fn node_rejections_have_no_hint() {
        let err = eyre::Report::new(CoreError::Rpc {
            code: -26,
            message: "txn-mempool-conflict".to_owned(),
        });
        assert!(rpc_error_hint("http://127.0.0.1:8332", &err).is_none());
    }
}
