//! Orderbook deployment CLI
//!
//! Command-line interface for deploying the Orderbook OApp and
//! transferring contract ownership across EVM chains.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orderbook_deployer::chain::EvmClient;
use orderbook_deployer::config::parse_address;
use orderbook_deployer::operator::{Operator, StdinOperator};
use orderbook_deployer::{
    deploy, transfer, vault, ChainRegistry, ContractArtifact, DeployerWallet, EncryptedWallet,
    Error, Result,
};
use secrecy::SecretString;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Env var holding the passphrase for the encrypted wallet. Prompted for
/// interactively when unset.
const PASSPHRASE_ENV: &str = "WALLET_PASSPHRASE";

#[derive(Parser)]
#[command(name = "orderbook-deployer")]
#[command(about = "Deploys the Orderbook OApp and manages contract ownership on EVM chains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the contract to a target network
    Deploy {
        /// Target network (apechain, mantle, arbitrum, sepolia)
        #[arg(short, long)]
        network: String,

        /// Path to the compiled contract artifact JSON
        #[arg(long)]
        artifact: Option<PathBuf>,
    },

    /// Transfer ownership of an already deployed contract
    Transfer {
        /// Target network (apechain, mantle, arbitrum, sepolia)
        #[arg(short, long)]
        network: String,

        /// Deployed contract address (prompted for when omitted)
        #[arg(long)]
        contract: Option<String>,

        /// New owner address (prompted for when omitted)
        #[arg(long)]
        new_owner: Option<String>,
    },

    /// List configured chain profiles
    Networks,

    /// Encrypt a mnemonic into an at-rest wallet blob
    Seal,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => {}
        Err(Error::Cancelled) => {
            // Deliberate abort, reported apart from error paths.
            println!("Operation aborted by the operator.");
            std::process::exit(2);
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy { network, artifact } => run_deploy(network, artifact).await,
        Commands::Transfer {
            network,
            contract,
            new_owner,
        } => run_transfer(network, contract, new_owner).await,
        Commands::Networks => {
            run_networks();
            Ok(())
        }
        Commands::Seal => run_seal(),
    }
}

/// Decrypt the vaulted mnemonic and derive the deployer wallet.
fn load_wallet(operator: &mut dyn Operator) -> Result<DeployerWallet> {
    let blob = EncryptedWallet::from_env()?;

    let passphrase = match std::env::var(PASSPHRASE_ENV) {
        Ok(passphrase) => SecretString::from(passphrase),
        Err(_) => SecretString::from(operator.prompt_line("Wallet passphrase: ")?),
    };

    let mnemonic = blob.decrypt(&passphrase)?;
    DeployerWallet::from_mnemonic(&mnemonic)
}

async fn run_deploy(network: String, artifact: Option<PathBuf>) -> Result<()> {
    // Resolve all configuration before touching secrets or the network.
    let registry = ChainRegistry::from_env();
    let profile = registry.resolve(&network)?;
    let artifact = match artifact {
        Some(path) => ContractArtifact::load(&path)?,
        None => ContractArtifact::load_default()?,
    };

    let mut operator = StdinOperator;
    let wallet = load_wallet(&mut operator)?;
    let client = EvmClient::connect(&wallet, &profile)?;

    deploy::run(&client, &profile, &artifact, &mut operator).await?;
    Ok(())
}

async fn run_transfer(
    network: String,
    contract: Option<String>,
    new_owner: Option<String>,
) -> Result<()> {
    let registry = ChainRegistry::from_env();
    let profile = registry.resolve(&network)?;

    let mut operator = StdinOperator;

    let contract = match contract {
        Some(input) => input,
        None => operator.prompt_line("Enter the deployed contract address: ")?,
    };
    let contract = parse_address(&contract)?;

    let new_owner = match new_owner {
        Some(input) => input,
        None => operator.prompt_line("Enter the new owner address: ")?,
    };
    let new_owner = parse_address(&new_owner)?;

    let wallet = load_wallet(&mut operator)?;
    let client = EvmClient::connect(&wallet, &profile)?;

    transfer::run(&client, &profile, contract, new_owner, &mut operator).await?;
    Ok(())
}

fn run_networks() {
    let registry = ChainRegistry::from_env();
    for profile in registry.profiles() {
        let rpc = if profile.rpc_url.is_empty() {
            "(unconfigured)"
        } else {
            profile.rpc_url.as_str()
        };
        println!(
            "{:<10} {:<14} eid={:<6} endpoint={} args={} rpc={rpc}",
            profile.name,
            profile.display_name,
            profile.endpoint_id,
            profile.endpoint_address,
            profile.constructor_args.len(),
        );
    }
}

fn run_seal() -> Result<()> {
    let mut operator = StdinOperator;

    let mnemonic = SecretString::from(operator.prompt_line("Mnemonic to encrypt: ")?);
    let passphrase = SecretString::from(operator.prompt_line("Passphrase: ")?);

    let blob = EncryptedWallet::seal(&mnemonic, &passphrase, vault::DEFAULT_KDF_ITERATIONS)?;

    println!("{}", serde_json::to_string(&blob)?);
    println!(
        "Export the line above as {} before running deploy or transfer.",
        vault::ENCRYPTED_WALLET_ENV
    );
    Ok(())
}
