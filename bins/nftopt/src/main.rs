//! NFTOpt binary
//!
//! Thin operational glue around the options engine: initialize and
//! validate configuration, or publish a single option request against
//! the configured oracle.

use anyhow::{Context, Result};
use cli::{Cli, Commands, FlavorArg};
use common::{Address, TokenId};
use config::{
    generate_default_config, load_config, save_config, validate_config, NftOptConfig, OracleMode,
};
use observability::{init_logging, LogFormat};
use options_engine::{
    EngineError, InMemoryLedger, OptionFlavor, OptionRequest, OptionRequestEngine,
};
use oracle::{AssetOracle, Erc721RpcOracle, MockAssetOracle};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Submit {
            config,
            submitter,
            contract,
            token_id,
            strike,
            interval,
            flavor,
            premium,
        } => {
            submit_command(
                config, &submitter, &contract, token_id, strike, interval, flavor, premium,
            )
            .await
        }
        Commands::Validate { config } => {
            init_logging("nftopt", LogFormat::Pretty)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("nftopt", LogFormat::Pretty)?;
            init_command(output)
        }
    }
}

fn load_validated_config<P: AsRef<Path>>(path: P) -> Result<NftOptConfig> {
    let config = load_config(&path)?;
    let report = validate_config(&config);

    for warning in &report.warnings {
        warn!(field = %warning.field, "{}", warning.message);
    }

    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Configuration validation failed");
    }

    Ok(config)
}

fn build_oracle(config: &NftOptConfig) -> Result<Arc<dyn AssetOracle>> {
    match config.oracle.mode {
        OracleMode::Mock => {
            let mut oracle = MockAssetOracle::new();
            for contract in &config.oracle.compliant_contracts {
                oracle = oracle.with_compliant_contract(*contract);
            }
            for fixture in &config.oracle.fixtures {
                oracle = oracle.with_owner(
                    fixture.contract,
                    TokenId(fixture.token_id),
                    fixture.owner,
                );
            }
            info!(
                contracts = config.oracle.compliant_contracts.len(),
                fixtures = config.oracle.fixtures.len(),
                "Using mock asset oracle"
            );
            Ok(Arc::new(oracle))
        }
        OracleMode::Rpc => {
            // Presence and shape already checked by the validator
            let raw = config
                .oracle
                .rpc_url
                .as_deref()
                .context("rpc mode without rpc_url")?;
            let endpoint = Url::parse(raw).context("invalid rpc_url")?;
            info!(%endpoint, "Using ERC-721 JSON-RPC oracle");
            Ok(Arc::new(Erc721RpcOracle::new(endpoint)))
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn submit_command<P: AsRef<Path>>(
    config_path: P,
    submitter: &str,
    contract: &str,
    token_id: u64,
    strike: u128,
    interval: u64,
    flavor: FlavorArg,
    premium: u128,
) -> Result<()> {
    let config = load_validated_config(config_path)?;

    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(&config.service.name, format)?;

    let submitter: Address = submitter
        .parse()
        .with_context(|| format!("invalid submitter address: {}", submitter))?;
    let asset_contract: Address = contract
        .parse()
        .with_context(|| format!("invalid contract address: {}", contract))?;

    let request = OptionRequest {
        asset_contract,
        asset_id: TokenId(token_id),
        strike_price: strike,
        interval,
        flavor: match flavor {
            FlavorArg::European => OptionFlavor::European,
            FlavorArg::American => OptionFlavor::American,
        },
        premium,
    };

    let oracle = build_oracle(&config)?;
    let ledger = Arc::new(InMemoryLedger::new());
    let engine = OptionRequestEngine::new(ledger, oracle);
    let mut events = engine.subscribe();

    match engine.publish_option_request(submitter, request).await {
        Ok(id) => {
            let option = engine.get_option(id).await?;

            println!("[ok] Option request published");
            println!();
            println!("Option ID:    {}", id);
            println!("Buyer:        {}", option.buyer);
            println!("Contract:     {}", option.asset_contract);
            println!("Token ID:     {}", option.asset_id);
            println!("Strike:       {} wei", option.strike_price);
            println!("Interval:     {} s", option.interval);
            println!("Premium:      {} wei", option.premium);
            println!("Flavor:       {}", option.flavor);
            println!("State:        {}", option.state);
            println!();
            println!("Escrow balance: {} wei", engine.get_balance().await);
            println!("Options so far: {}", engine.get_next_id().await);

            if let Ok(event) = events.try_recv() {
                println!();
                println!("Notification: {:?}", event);
            }

            Ok(())
        }
        Err(EngineError::Rejected(reason)) => {
            println!("[rejected] {}", reason);
            anyhow::bail!("option request rejected");
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Oracle mode: {:?}", config.oracle.mode);
    println!(
        "Compliant contracts: {}",
        config.oracle.compliant_contracts.len()
    );
    println!("Ownership fixtures: {}", config.oracle.fixtures.len());

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - Mock oracle with 1 compliant contract and 3 owned tokens");
    println!("  - Pretty log format");
    println!();
    println!("Next steps:");
    println!("  1. Edit the file to script contracts and ownership, or switch to rpc mode");
    println!(
        "  2. Run 'nftopt validate --config {:?}' to check it",
        output_path
    );
    println!(
        "  3. Run 'nftopt submit --config {:?} --submitter 0x... --contract 0x... \
         --token-id 1 --strike 50 --interval 604800 --premium 3' to publish a request",
        output_path
    );

    Ok(())
}
