//! Hemolink command-line client.
//!
//! One parameterized command surface over the API client: what the browser
//! build spread across dozens of page components (collect input, call the
//! backend, render the list) collapses here into subcommands that print JSON.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hemolink_api::{AdminClient, HemolinkClient};
use hemolink_client_core::{
    CredentialStore, FileCredentialStore, normalize_base_url, resolve_api_base_url,
};
use serde::Serialize;

mod admin_cli;
mod auth_cli;
mod donor_cli;
mod inventory_cli;
mod request_cli;

pub const ENV_CREDENTIALS_FILE: &str = "HEMOLINK_CREDENTIALS_FILE";

#[derive(Parser)]
#[command(name = "hemolink")]
#[command(about = "Hemolink blood-donation platform CLI")]
pub struct HemolinkCli {
    /// Backend base URL. Falls back to HEMOLINK_API_BASE_URL, then the
    /// local development backend.
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Credential file. Falls back to HEMOLINK_CREDENTIALS_FILE, then the
    /// user config directory.
    #[arg(long, global = true)]
    pub credentials_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Sessions and account (login, logout, register, me, profile)
    Auth(auth_cli::AuthArgs),
    /// Donor directory and search
    Donors(donor_cli::DonorArgs),
    /// Blood requests and notifications
    Requests(request_cli::RequestArgs),
    /// Hospital inventory and donation history
    Inventory(inventory_cli::InventoryArgs),
    /// Admin console (separate session scope)
    Admin(admin_cli::AdminArgs),
    /// Aggregated dashboard summary
    Dashboard,
    /// Platform analytics
    Analytics,
}

/// Resolved connection settings shared by every subcommand.
pub struct CliContext {
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl CliContext {
    fn from_cli(cli: &HemolinkCli) -> anyhow::Result<Self> {
        let base_url = match cli.api_base_url.as_deref() {
            Some(raw) => normalize_base_url(raw)?,
            None => resolve_api_base_url()?.0,
        };
        let path = credentials_path(cli.credentials_file.clone())?;
        Ok(Self {
            base_url,
            store: Arc::new(FileCredentialStore::new(path)),
        })
    }

    fn user_client(&self) -> anyhow::Result<HemolinkClient> {
        Ok(HemolinkClient::new(&self.base_url, self.store.clone())?)
    }

    fn admin_client(&self) -> anyhow::Result<AdminClient> {
        Ok(AdminClient::new(&self.base_url, self.store.clone())?)
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

fn credentials_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(ENV_CREDENTIALS_FILE) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    let config_dir = dirs::config_dir().context("could not determine a config directory")?;
    Ok(config_dir.join("hemolink").join("credentials.json"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    let cli = HemolinkCli::parse();
    let context = CliContext::from_cli(&cli)?;
    match cli.command {
        Commands::Auth(args) => auth_cli::run(&context, args).await,
        Commands::Donors(args) => donor_cli::run(&context, args).await,
        Commands::Requests(args) => request_cli::run(&context, args).await,
        Commands::Inventory(args) => inventory_cli::run(&context, args).await,
        Commands::Admin(args) => admin_cli::run(&context, args).await,
        Commands::Dashboard => {
            let summary = context.user_client()?.dashboard_summary().await?;
            print_json(&summary)
        }
        Commands::Analytics => {
            let analytics = context.user_client()?.analytics().await?;
            print_json(&analytics)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::HemolinkCli;

    #[test]
    fn cli_requires_subcommand() {
        let err = match HemolinkCli::try_parse_from(["hemolink"]) {
            Ok(_) => panic!("expected missing subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        let err = match HemolinkCli::try_parse_from(["hemolink", "unknown-subcommand"]) {
            Ok(_) => panic!("expected invalid subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = HemolinkCli::try_parse_from([
            "hemolink",
            "--api-base-url",
            "https://api.hemolink.org",
            "dashboard",
        ])
        .expect("parse");
        assert_eq!(
            cli.api_base_url.as_deref(),
            Some("https://api.hemolink.org")
        );

        let cli = HemolinkCli::try_parse_from([
            "hemolink",
            "dashboard",
            "--credentials-file",
            "/tmp/creds.json",
        ])
        .expect("parse");
        assert_eq!(
            cli.credentials_file.as_deref(),
            Some(std::path::Path::new("/tmp/creds.json"))
        );
    }
}
