use chrono::{TimeZone, Utc};
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Stable user id (the `sub` claim)")]
    pub user: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let mut claims = Claims::new(args.user, hours);
    claims.email = args.email;
    claims.first_name = args.first_name;
    claims.last_name = args.last_name;

    let token = generate_jwt(&claims, &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "token": token, "sub": claims.sub, "exp": claims.exp })
        ),
        OutputFormat::Text => {
            println!("{}", token);
            if let Some(expires) = Utc.timestamp_opt(claims.exp, 0).single() {
                eprintln!("Expires {}", expires.to_rfc3339());
            }
        }
    }
    Ok(())
}
