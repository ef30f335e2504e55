use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nftopt")]
#[command(about = "NFTOpt - a peer-to-peer NFT options market engine")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish an option request against the configured oracle
    Submit {
        /// Path to the configuration file
        #[arg(short, long, default_value = "nftopt.yaml")]
        config: PathBuf,

        /// Submitter account (0x-prefixed hex address)
        #[arg(long)]
        submitter: String,

        /// NFT registry contract address
        #[arg(long)]
        contract: String,

        /// NFT token ID within the registry
        #[arg(long)]
        token_id: u64,

        /// Strike price in wei
        #[arg(long)]
        strike: u128,

        /// Expiration interval in seconds
        #[arg(long)]
        interval: u64,

        /// Option flavor
        #[arg(long, value_enum, default_value = "european")]
        flavor: FlavorArg,

        /// Premium attached to the submission, in wei
        #[arg(long)]
        premium: u128,
    },

    /// Validate configuration without submitting anything
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "nftopt.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "nftopt.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FlavorArg {
    /// Exercisable only at expiration
    European,

    /// Exercisable any time before expiration
    American,
}

impl FlavorArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorArg::European => "european",
            FlavorArg::American => "american",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
