use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use votemak_merkle::TreeScheme;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "votemak")]
#[command(about = "Votemak CLI - Multi-token bribe distributions with merkle claims")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate votes and bribes into per-token merkle trees and user claims
    GenerateDistribution {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "votemak.yaml")]
        config: PathBuf,

        /// Per-user vote snapshot (userVotes.json)
        #[arg(short, long)]
        user_votes: PathBuf,

        /// Decoded fee and bribe events (JSON)
        #[arg(short, long)]
        bribes_in: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, default_value = "data")]
        output_dir: PathBuf,

        /// Chain id of the connected network (defaults to the configured one)
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Build one merkle tree from a balance file (JSON map or list, or CSV)
    ParseBalanceMap {
        /// Balance file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the distributor info
        #[arg(short, long)]
        output: PathBuf,

        /// Tree scheme: sorted or positional
        #[arg(long, default_value = "sorted")]
        tree_scheme: TreeScheme,
    },

    /// Re-derive and cross-check a generated distribution
    Validate {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "votemak.yaml")]
        config: PathBuf,

        /// Per-user vote snapshot (userVotes.json)
        #[arg(short, long)]
        user_votes: PathBuf,

        /// Vote tracker totals (JSON)
        #[arg(short, long)]
        system_votes: PathBuf,

        /// Decoded fee and bribe events (JSON)
        #[arg(short, long)]
        bribes_in: PathBuf,

        /// Distributor token balances, token -> amount (JSON)
        #[arg(long)]
        balances: PathBuf,

        /// Generated multiMerkleDistributorInfo.json
        #[arg(short, long)]
        distributor_info: PathBuf,

        /// Generated userClaims.json
        #[arg(long)]
        user_claims: PathBuf,

        /// Chain id of the connected network (defaults to the configured one)
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Verify one account's published proof for one token
    VerifyProof {
        /// Generated multiMerkleDistributorInfo.json
        #[arg(short, long)]
        distributor_info: PathBuf,

        /// Token address
        #[arg(short, long)]
        token: String,

        /// Claimant address
        #[arg(short, long)]
        account: String,
    },

    /// Print every claim of one address
    LookupClaims {
        /// Generated userClaims.json
        #[arg(short, long)]
        user_claims: PathBuf,

        /// Address to look up (any casing)
        #[arg(short, long)]
        address: String,
    },

    /// Write one JSON file of voter allocations per reactor
    ExportReactors {
        /// Per-user vote snapshot (userVotes.json)
        #[arg(short, long)]
        user_votes: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "data/reactors")]
        output_dir: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateDistribution {
            config,
            user_votes,
            bribes_in,
            output_dir,
            chain_id,
        } => commands::generate_distribution::execute(
            config, user_votes, bribes_in, output_dir, chain_id,
        ),

        Commands::ParseBalanceMap {
            input,
            output,
            tree_scheme,
        } => commands::parse_balance_map::execute(input, output, tree_scheme),

        Commands::Validate {
            config,
            user_votes,
            system_votes,
            bribes_in,
            balances,
            distributor_info,
            user_claims,
            chain_id,
        } => commands::validate::execute(commands::validate::ValidateInputs {
            config,
            user_votes,
            system_votes,
            bribes_in,
            balances,
            distributor_info,
            user_claims,
            chain_id,
        }),

        Commands::VerifyProof {
            distributor_info,
            token,
            account,
        } => commands::verify_proof::execute(distributor_info, token, account),

        Commands::LookupClaims {
            user_claims,
            address,
        } => commands::lookup_claims::execute(user_claims, address),

        Commands::ExportReactors {
            user_votes,
            output_dir,
        } => commands::export_reactors::execute(user_votes, output_dir),
    }
}
