pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "landlord")]
#[command(about = "Landlord CLI - administration for the Landlord API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending PostgreSQL schema migrations")]
    Migrate,

    #[command(about = "Mint a development bearer token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Print dashboard statistics for a user")]
    Stats(commands::stats::StatsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();

    match cli.command {
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Token(args) => commands::token::handle(args, config, output_format),
        Commands::Stats(args) => commands::stats::handle(args, config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from(["landlord", "token", "--user", "u-1", "--email", "a@b.c", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.user, "u-1");
                assert_eq!(args.email.as_deref(), Some("a@b.c"));
                assert_eq!(args.hours, None);
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn stats_requires_user() {
        assert!(Cli::try_parse_from(["landlord", "stats"]).is_err());
    }
}
