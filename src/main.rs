//! Keyforge CLI
//!
//! Thin host around the derivation engine. Records persist in a flat JSON
//! array store. Allocation counters persist beside it in `<store>.alloc.json`
//! so removing or clearing records never frees an index.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use keyforge::{
    log_debug, ChainId, EngineSettings, Mnemonic, MnemonicStrength, WalletRecord, WalletRegistry,
};
use serde_json::json;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zeroize::Zeroizing;

/// Keyforge - HD key derivation for Ethereum and Solana
#[derive(Parser)]
#[command(name = "keyforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new mnemonic phrase
    Generate(GenerateArgs),

    /// Check a mnemonic phrase (exit 0 if valid, 1 if not)
    Validate(ValidateArgs),

    /// Derive the next wallet(s) for a chain
    Derive(DeriveArgs),

    /// List stored wallets
    List(ListArgs),

    /// Remove a stored wallet by id
    Remove(RemoveArgs),

    /// Remove every stored wallet
    Clear(StoreArgs),

    /// Re-derive every stored wallet and compare keys
    Verify(VerifyArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Phrase length
    #[arg(short, long, value_parser = parse_word_count)]
    words: Option<MnemonicStrength>,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Phrase words (quoted as one argument or given separately)
    #[arg(required = true, num_args = 1..)]
    phrase: Vec<String>,
}

#[derive(Args)]
struct StoreArgs {
    /// JSON store file
    #[arg(short, long)]
    store: PathBuf,
}

#[derive(Args)]
struct OutputArgs {
    /// Print records as JSON (includes secrets)
    #[arg(long)]
    json: bool,

    /// Include private key and mnemonic in text output
    #[arg(long)]
    show_secrets: bool,
}

#[derive(Args)]
struct DeriveArgs {
    /// ethereum | solana
    #[arg(long)]
    chain: ChainId,

    /// Phrase to derive from; `-` reads it from stdin. Omit to generate one.
    #[arg(short, long)]
    mnemonic: Option<String>,

    /// Optional BIP-39 passphrase
    #[arg(short, long, default_value = "")]
    passphrase: String,

    /// Number of consecutive wallets to derive
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Length of a generated phrase
    #[arg(short, long, value_parser = parse_word_count)]
    words: Option<MnemonicStrength>,

    /// JSON store file to load from and save to
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Only show one chain
    #[arg(long)]
    chain: Option<ChainId>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct VerifyArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// BIP-39 passphrase the stored wallets were derived with
    #[arg(short, long, default_value = "")]
    passphrase: String,
}

#[derive(Args)]
struct RemoveArgs {
    id: String,

    #[command(flatten)]
    store: StoreArgs,
}

fn parse_word_count(s: &str) -> std::result::Result<MnemonicStrength, String> {
    s.parse::<usize>()
        .ok()
        .and_then(MnemonicStrength::from_word_count)
        .ok_or_else(|| format!("word count must be 12 or 24, got '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = match &cli.config {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => EngineSettings::standard(),
    };
    if cli.verbose {
        settings.debug_logging = true;
    }
    for warning in settings.validate() {
        eprintln!("{}", warning);
    }
    settings.apply_logging();

    match cli.command {
        Commands::Generate(args) => {
            let strength = args.words.unwrap_or(settings.mnemonic_strength);
            let mnemonic = Mnemonic::generate(strength)?;
            if args.json {
                let out = json!({ "mnemonic": mnemonic, "words": mnemonic.word_count() });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", mnemonic.phrase().as_str());
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => {
            let phrase = Zeroizing::new(args.phrase.join(" "));
            match Mnemonic::parse(&phrase) {
                Ok(mnemonic) => {
                    println!("valid ({} words)", mnemonic.word_count());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("invalid: {}", e.message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Derive(args) => {
            if args.count == 0 {
                bail!("--count must be at least 1");
            }
            let registry = WalletRegistry::with_settings(settings);
            if let Some(words) = args.words {
                registry.update_settings(|s| s.mnemonic_strength = words)?;
            }
            if let Some(store) = &args.store {
                load_store(&registry, store)?;
            }

            let mnemonic_input = match args.mnemonic.as_deref() {
                Some("-") => Some(read_stdin()?),
                other => other.map(|s| Zeroizing::new(s.to_string())),
            };

            // A generated phrase is reused for every wallet in this batch
            let first = registry.derive_wallet_with_passphrase(
                args.chain,
                mnemonic_input.as_deref().map(String::as_str),
                &args.passphrase,
            )?;
            let phrase = first.mnemonic.phrase();
            let mut derived = vec![first];
            for _ in 1..args.count {
                derived.push(registry.derive_wallet_with_passphrase(
                    args.chain,
                    Some(phrase.as_str()),
                    &args.passphrase,
                )?);
            }

            if let Some(store) = &args.store {
                save_store(&registry, store)?;
            }
            print_records(&derived, &args.output)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::List(args) => {
            let registry = WalletRegistry::with_settings(settings);
            load_store(&registry, &args.store.store)?;
            let records = match args.chain {
                Some(chain) => registry.records_for(chain)?,
                None => registry.records()?,
            };
            print_records(&records, &args.output)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Remove(args) => {
            let registry = WalletRegistry::with_settings(settings);
            load_store(&registry, &args.store.store)?;
            if !registry.remove_wallet(&args.id)? {
                bail!("no wallet with id {}", args.id);
            }
            save_store(&registry, &args.store.store)?;
            println!("removed {}", args.id);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Clear(args) => {
            let registry = WalletRegistry::with_settings(settings);
            load_store(&registry, &args.store)?;
            let count = registry.clear_all()?;
            save_store(&registry, &args.store)?;
            println!("removed {} wallet(s)", count);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Verify(args) => {
            let registry = WalletRegistry::with_settings(settings);
            load_store(&registry, &args.store.store)?;

            let mut failures = 0;
            for record in registry.records()? {
                let ok = record.verify_with_passphrase(&args.passphrase)?;
                if !ok {
                    failures += 1;
                }
                println!("{} {} {}", if ok { "ok  " } else { "FAIL" }, record.id, record.path);
            }
            Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn read_stdin() -> Result<Zeroizing<String>> {
    let mut buffer = Zeroizing::new(String::new());
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read mnemonic from stdin")?;
    Ok(buffer)
}

fn load_store(registry: &WalletRegistry, path: &Path) -> Result<()> {
    if path.exists() {
        let json = Zeroizing::new(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        );
        if !json.trim().is_empty() {
            registry
                .import_json(&json)
                .with_context(|| format!("failed to parse store {}", path.display()))?;
        }
    } else {
        log_debug!("cli", "Store not found, starting empty", store = path.display());
    }

    let alloc_path = allocation_path(path);
    if alloc_path.exists() {
        let marks = std::fs::read_to_string(&alloc_path)
            .with_context(|| format!("failed to read {}", alloc_path.display()))?;
        registry
            .import_allocations_json(&marks)
            .with_context(|| format!("failed to parse allocations {}", alloc_path.display()))?;
    }
    Ok(())
}

fn save_store(registry: &WalletRegistry, path: &Path) -> Result<()> {
    let json = Zeroizing::new(registry.export_json()?);
    std::fs::write(path, json.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    let alloc_path = allocation_path(path);
    std::fs::write(&alloc_path, registry.export_allocations_json()?)
        .with_context(|| format!("failed to write {}", alloc_path.display()))?;
    Ok(())
}

fn allocation_path(store: &Path) -> PathBuf {
    let mut path = store.as_os_str().to_owned();
    path.push(".alloc.json");
    PathBuf::from(path)
}

fn print_records(records: &[WalletRecord], output: &OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    for record in records {
        println!("{}  {:<8}  {}  {}", record.id, record.chain, record.path, record.address);
        if output.show_secrets {
            println!("    private key: {}", record.private_key_hex);
            println!("    mnemonic:    {}", record.mnemonic.phrase().as_str());
        }
    }
    Ok(())
}
