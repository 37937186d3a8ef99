//! Sui Wallet Session CLI
//!
//! Local key tools plus a connect-and-query session driven by a local key.

use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::sync::Arc;
use sui_wallet_session::chain::ChainClient;
use sui_wallet_session::snapshot::MAX_DISPLAYED_OBJECTS;
use sui_wallet_session::{
    BalanceSnapshot, Config, Error, KeyManager, LocalConnectorFactory, Network, Result,
    SuiAddress, SuiKeyPair, SuiRpcClient, WalletSession, PRIVATE_KEY_ENV,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "wallet-session")]
#[command(about = "Sui wallet session and local key tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network (mainnet, testnet, devnet, localnet); overrides the config file
    #[arg(short, long, global = true)]
    network: Option<Network>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair and print its mnemonic
    Generate,

    /// Derive the address of an existing mnemonic or private key
    Inspect {
        /// BIP-39 mnemonic phrase
        #[arg(long)]
        mnemonic: Option<String>,

        /// Base64-encoded Ed25519 private key
        #[arg(long)]
        private_key: Option<String>,
    },

    /// Show the coin balances of an address
    Balances {
        /// Owner address (0x-prefixed hex)
        address: String,
    },

    /// Show the first owned objects of an address
    Objects {
        /// Owner address (0x-prefixed hex)
        address: String,
    },

    /// Connect with the key in SUI_PRIVATE_KEY and send the test transfer to self
    SendTest,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }

    match cli.command {
        Commands::Generate => run_generate(),
        Commands::Inspect {
            mnemonic,
            private_key,
        } => run_inspect(mnemonic, private_key),
        Commands::Balances { address } => run_balances(&config, &address).await,
        Commands::Objects { address } => run_objects(&config, &address).await,
        Commands::SendTest => run_send_test(&config).await,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_generate() -> Result<()> {
    let mut keys = KeyManager::new();
    let address = keys.create_wallet();

    println!("Address:     {}", address);
    println!("Mnemonic:    {}", keys.reveal_mnemonic()?.expose_secret());
    println!("Private key: {}", keys.reveal_private_key()?.expose_secret());
    println!();
    println!("Store the mnemonic somewhere safe; it is not saved anywhere.");
    Ok(())
}

fn run_inspect(mnemonic: Option<String>, private_key: Option<String>) -> Result<()> {
    let mut keys = KeyManager::new();
    if let Some(mnemonic) = mnemonic {
        keys.set_mnemonic_input(mnemonic);
    }
    if let Some(private_key) = private_key {
        keys.set_private_key_input(private_key);
    }

    let address = keys.import_wallet()?;
    let account = keys.current().ok_or(Error::NoAccount)?;

    println!("Address:    {}", address);
    println!("Public key: {}", account.keypair().public_key_base64());
    println!("Origin:     {:?}", account.origin());
    Ok(())
}

async fn run_balances(config: &Config, address: &str) -> Result<()> {
    let owner = SuiAddress::from_hex(address)?;
    let client = SuiRpcClient::new(config.rpc());

    tracing::info!(address = %owner, network = %config.network, "Fetching balances");
    let coins = client
        .get_all_balances(config.network, &owner.to_hex())
        .await?;
    let snapshot = BalanceSnapshot::from_coins(coins, config.balance_format);

    if snapshot.is_empty() {
        println!("No balances for {}", owner.short());
    }
    for (coin_type, balance) in snapshot.iter() {
        println!("{}: {}", coin_type, balance.formatted);
    }
    Ok(())
}

async fn run_objects(config: &Config, address: &str) -> Result<()> {
    let owner = SuiAddress::from_hex(address)?;
    let client = SuiRpcClient::new(config.rpc());

    tracing::info!(address = %owner, network = %config.network, "Fetching owned objects");
    let objects = client
        .get_owned_objects(config.network, &owner.to_hex(), MAX_DISPLAYED_OBJECTS)
        .await?;

    if objects.is_empty() {
        println!("No objects owned by {}", owner.short());
    }
    for object in objects.iter().take(MAX_DISPLAYED_OBJECTS) {
        println!(
            "{}  {}",
            object.object_id,
            object.object_type.as_deref().unwrap_or("<unknown type>")
        );
    }
    Ok(())
}

async fn run_send_test(config: &Config) -> Result<()> {
    let private_key = std::env::var(PRIVATE_KEY_ENV)
        .map_err(|_| Error::Config(format!("{} is not set", PRIVATE_KEY_ENV)))?;
    let keypair = Arc::new(SuiKeyPair::from_base64(&private_key)?);
    tracing::info!(address = %keypair.address(), "Loaded key from {}", PRIVATE_KEY_ENV);

    let rpc = config.rpc();
    let factory = LocalConnectorFactory::new(keypair, rpc.clone());
    let session = WalletSession::from_config(SuiRpcClient::new(rpc), config);

    session.initialize(&factory).await?;
    let account = session.connect().await?;

    let view = session.view().await;
    println!("Connected {} on {}", account.address, view.network);
    for (coin_type, balance) in view.balances.iter() {
        println!("  {}: {}", coin_type, balance.formatted);
    }

    let result = session.send_test_transaction().await;
    match &result {
        Ok(submitted) => {
            println!("Submitted {} at {}", submitted.digest, submitted.submitted_at);
            for (coin_type, balance) in session.balances().await.iter() {
                println!("  {}: {}", coin_type, balance.formatted);
            }
        }
        Err(e) => println!("Test transaction failed: {}", e),
    }

    session.shutdown().await;
    result.map(|_| ())
}
