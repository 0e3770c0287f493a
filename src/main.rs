use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rpcrest::rpc::{Request, RpcClient};
use rpcrest::{config, context, logging, web};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rpcrest")]
#[command(about = "Unified JSON-RPC system administration service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(ServerArgs),
    /// Send one RPC call to a running server
    Call(CallArgs),
}

#[derive(Args, Serialize)]
struct ServerArgs {
    #[serde(skip)]
    #[arg(long)]
    config: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    bind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    verbose: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    json_logs: Option<bool>,
}

#[derive(Args)]
struct CallArgs {
    /// Method name, e.g. `reboot` or `status`
    method: String,

    /// Parameters as a JSON object
    #[arg(long)]
    params: Option<String>,

    #[arg(long, default_value = "1")]
    id: String,

    #[arg(long, default_value = "http://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = config::AppConfig::new(args.config.as_deref(), Some(&args))
                .context("Failed to load configuration")?;
            logging::init(logging::LogConfig::from(&config));
            run_server(context::AppContext::new(config))
                .await
                .context("Failed to run server")?
        }
        Commands::Call(args) => run_call(args).await.context("RPC call failed")?,
    }

    Ok(())
}

async fn run_server(ctx: context::AppContext) -> Result<()> {
    let server = Arc::new(web::WebServer::new(&ctx, ctx.config.bind));

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_server.shutdown();
        }
    });

    server.start().await
}

async fn run_call(args: CallArgs) -> Result<()> {
    let params: Option<serde_json::Value> = args
        .params
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--params is not valid JSON")?;

    let client = RpcClient::new(&args.url);
    let response = client
        .send(&Request::new(args.method, params, args.id))
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
