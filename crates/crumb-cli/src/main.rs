use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{cookie, keys, token};

#[derive(Parser, Debug)]
#[command(name = "crumb", version, about = "Crumb signed-cookie authentication tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Signing secret management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Mint, verify and inspect tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Print the Set-Cookie headers a server would emit
    Cookie {
        #[command(subcommand)]
        cmd: CookieCommand,
    },
}

/// Where the signing secret and policy settings come from.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Signing secret, or a path to a file holding it
    #[arg(long, env = "CRUMB_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Policy configuration file (crumb.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new random signing secret
    Generate {
        /// Write the secret to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a signed token for a principal
    Mint {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Principal stored in the `sub` claim
        #[arg(long)]
        sub: String,

        /// Token lifetime, e.g. 30m, 1h, 7d or 90s (overrides the config)
        #[arg(long)]
        expires: Option<String>,

        /// Extra claim as key=value; the value is parsed as JSON when possible
        #[arg(long = "claim", value_name = "KEY=VALUE")]
        claims: Vec<String>,

        /// Write the token to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify a token and print its claims
    Verify {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Token string or path to a file containing it
        token: String,
    },

    /// Decode a token without verifying its signature
    Inspect {
        /// Token string or path to a file containing it
        token: String,
    },
}

#[derive(Subcommand, Debug)]
enum CookieCommand {
    /// Headers that log a principal in
    Remember {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Principal stored in the `sub` claim
        #[arg(long)]
        sub: String,

        /// Extra claim as key=value; the value is parsed as JSON when possible
        #[arg(long = "claim", value_name = "KEY=VALUE")]
        claims: Vec<String>,
    },

    /// Headers that log the client out
    Forget {
        /// Policy configuration file (crumb.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => keys::generate(output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                policy,
                sub,
                expires,
                claims,
                output,
            } => token::mint(&policy, &sub, expires.as_deref(), &claims, output)?,
            TokenCommand::Verify { policy, token } => {
                token::verify(&policy, &token)?;
            }
            TokenCommand::Inspect { token } => token::inspect(&token)?,
        },

        Command::Cookie { cmd } => match cmd {
            CookieCommand::Remember {
                policy,
                sub,
                claims,
            } => cookie::remember(&policy, &sub, &claims)?,
            CookieCommand::Forget { config } => cookie::forget(config.as_deref())?,
        },
    }

    Ok(())
}
