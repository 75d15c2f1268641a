//! Certum command line: verify certificates, issue them, and serve the
//! verification API.

use anyhow::Context;
use certum_issuance::{BrandSubmission, IssuanceError, MintStatus};
use certum_node::{EngineConfig, SolanaEngine};
use certum_store::ImageAsset;
use certum_types::{Cluster, ProductCategory};
use certum_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "certum", about = "Tamper-evident product certificates on Solana")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "CERTUM_CONFIG")]
    config: Option<PathBuf>,

    /// Cluster: "mainnet-beta", "testnet", "devnet", or "localnet".
    #[arg(long, env = "CERTUM_CLUSTER")]
    cluster: Option<String>,

    /// JSON-RPC endpoint (defaults to the cluster's public endpoint).
    #[arg(long, env = "CERTUM_RPC_URL")]
    rpc_url: Option<String>,

    /// Wallet bridge URL used to sign issuance transactions.
    #[arg(long, env = "CERTUM_SIGNER_URL")]
    signer_url: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CERTUM_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CERTUM_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify a scanned identifier or link and print the verdict as JSON.
    Verify {
        /// Identifier, deep link, or `/result/<id>` path.
        input: String,
    },
    /// Publish metadata for a product and mint its certificate.
    Issue {
        #[arg(long)]
        name: String,
        /// One of the fixed product categories, e.g. "electronics".
        #[arg(long)]
        category: String,
        #[arg(long)]
        serial: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Product image to publish alongside the metadata.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Print the verification deep link (QR payload) for an identifier.
    Link { id: String },
    /// Serve the HTTP verification API.
    Serve {
        /// Listen port (defaults to the configured port).
        #[arg(long, env = "CERTUM_PORT")]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(cluster) = &cli.cluster {
        config.cluster = cluster.parse::<Cluster>()?;
    }
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = Some(url.clone());
    }
    if let Some(url) = &cli.signer_url {
        config.signer_url = Some(url.clone());
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.parse::<LogFormat>()?;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Command::Serve { port: Some(port) } = &cli.command {
        config.listen_port = *port;
    }
    config.validate()?;
    Ok(config)
}

async fn issue(
    engine: &SolanaEngine,
    submission: BrandSubmission,
) -> anyhow::Result<()> {
    let signer = engine.connect_signer().await?;
    match engine.issue(&submission, &signer).await {
        Ok(issued) => {
            println!("mint:      {}", issued.ledger_id);
            println!("signature: {}", issued.signature);
            println!("metadata:  {}", issued.metadata.uri);
            if let Some(image) = &issued.image {
                println!("image:     {}", image.uri);
            }
            println!("link:      {}", issued.verification_link);
            Ok(())
        }
        Err(e) if e.is_ambiguous() => {
            tracing::warn!("issuance outcome unknown: {e}; checking the ledger");
            match engine.reconcile(&e).await {
                MintStatus::Minted(record) => {
                    println!("mint:      {}", record.ledger_id);
                    println!("metadata:  {}", record.metadata_uri);
                    println!(
                        "link:      {}",
                        engine.verification_link(&record.ledger_id)
                    );
                    Ok(())
                }
                MintStatus::NotMinted => Err(anyhow::anyhow!(
                    "{e}; nothing was minted, it is safe to retry"
                )),
                MintStatus::Indeterminate(reason) => Err(anyhow::anyhow!(
                    "{e}; do not retry yet: {reason}"
                )),
            }
        }
        Err(e @ IssuanceError::SignerUnavailable) => {
            Err(anyhow::anyhow!("{e}; connect the wallet bridge and retry"))
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    certum_utils::init_logging(config.log_format, &config.log_level)?;

    let engine = SolanaEngine::from_config(config)?;

    match cli.command {
        Command::Verify { input } => {
            let verdict = engine.verify(&input).await;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::Issue {
            name,
            category,
            serial,
            description,
            image,
        } => {
            let image = match image {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("reading image {}", path.display()))?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "image".to_string());
                    Some(ImageAsset::new(bytes, file_name))
                }
                None => None,
            };
            let submission = BrandSubmission {
                name,
                category: category.parse::<ProductCategory>()?,
                serial,
                description,
                image,
            };
            issue(&engine, submission).await?;
        }
        Command::Link { id } => {
            println!("{}", engine.resolve_link(&id)?);
        }
        Command::Serve { .. } => {
            tracing::info!(
                "Starting certum verification API on {} (port {})",
                engine.config().cluster,
                engine.config().listen_port
            );
            engine
                .serve(async {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Shutdown signal received");
                })
                .await?;
            tracing::info!("certum exited cleanly");
        }
    }

    Ok(())
}
