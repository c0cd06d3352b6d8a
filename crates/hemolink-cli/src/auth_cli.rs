//! Session and account commands.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use hemolink_api::types::{ProfileUpdate, RegisterRequest};
use hemolink_client_core::{
    BloodGroup, LoginIdentifier, SessionScope, normalize_email,
    validate_last_donation,
};

use crate::{CliContext, print_json};

#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and persist the session
    Login {
        /// Username, email, or full name (a value with spaces is treated as
        /// a full name)
        identifier: String,
        #[arg(long)]
        password: String,
        /// If the account is staff, mirror the session into the admin scope
        #[arg(long)]
        sync_admin: bool,
    },
    /// Drop the stored user session
    Logout,
    /// Register a donor account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        blood_group: BloodGroupArg,
        #[arg(long)]
        district: String,
        /// Date of a donation within the last three months, if any
        #[arg(long)]
        last_donation: Option<NaiveDate>,
        #[arg(long)]
        share_phone: bool,
    },
    /// Show the authenticated account
    Me,
    /// Show the donor profile
    Profile,
    /// Update the donor profile (absent flags clear the stored value)
    UpdateProfile {
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        blood_group: Option<BloodGroupArg>,
        #[arg(long)]
        last_donation: Option<NaiveDate>,
    },
    /// Show which sessions are active
    Status,
}

/// Blood group as a clap value, parsed through the canonical set.
#[derive(Debug, Clone, Copy)]
pub struct BloodGroupArg(pub BloodGroup);

impl std::str::FromStr for BloodGroupArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse::<BloodGroup>()
            .map(Self)
            .map_err(|error| error.to_string())
    }
}

pub async fn run(context: &CliContext, args: AuthArgs) -> anyhow::Result<()> {
    let client = context.user_client()?;
    match args.command {
        AuthCommands::Login {
            identifier,
            password,
            sync_admin,
        } => {
            let identifier = LoginIdentifier::classify(&identifier)?;
            client.login(identifier, &password).await?;
            println!("logged in");
            if sync_admin {
                // A failed mirror never blocks the login itself.
                match client.sync_admin_session().await {
                    Ok(true) => println!("admin session mirrored"),
                    Ok(false) => println!("account is not staff; admin scope untouched"),
                    Err(error) => tracing::warn!(%error, "admin session mirror failed"),
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            client.logout();
            println!("logged out");
            Ok(())
        }
        AuthCommands::Register {
            username,
            email,
            password,
            blood_group,
            district,
            last_donation,
            share_phone,
        } => {
            let email = normalize_email(&email)?;
            if let Some(date) = last_donation {
                validate_last_donation(date, Utc::now().date_naive())?;
            }
            let username = username.trim().to_string();
            let available = client
                .username_available(&username)
                .await
                .context("username availability check failed")?;
            anyhow::ensure!(available, "username '{username}' is not available");

            client
                .register(&RegisterRequest {
                    username,
                    email,
                    password,
                    blood_group: blood_group.0.as_str().to_string(),
                    last_donation,
                    district,
                    share_phone,
                })
                .await?;
            println!("registered");
            Ok(())
        }
        AuthCommands::Me => {
            let account = client.me().await?;
            print_json(&account)
        }
        AuthCommands::Profile => {
            let profile = client.profile().await?;
            print_json(&profile)
        }
        AuthCommands::UpdateProfile {
            phone,
            blood_group,
            last_donation,
        } => {
            client
                .update_profile(&ProfileUpdate {
                    phone,
                    blood_group: blood_group.map(|group| group.0.as_str().to_string()),
                    last_donation,
                })
                .await?;
            println!("profile updated");
            Ok(())
        }
        AuthCommands::Status => {
            let store = context.store();
            print_json(&serde_json::json!({
                "user": store.session_active(SessionScope::User),
                "admin": store.session_active(SessionScope::Admin),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::HemolinkCli;

    #[test]
    fn login_parses_identifier_and_flags() {
        let cli = HemolinkCli::try_parse_from([
            "hemolink",
            "auth",
            "login",
            "Ayesha Rahman",
            "--password",
            "pw",
            "--sync-admin",
        ])
        .expect("parse");
        match cli.command {
            crate::Commands::Auth(args) => match args.command {
                super::AuthCommands::Login {
                    identifier,
                    sync_admin,
                    ..
                } => {
                    assert_eq!(identifier, "Ayesha Rahman");
                    assert!(sync_admin);
                }
                _ => panic!("expected login"),
            },
            _ => panic!("expected auth subcommand"),
        }
    }

    #[test]
    fn register_rejects_unknown_blood_group() {
        let result = HemolinkCli::try_parse_from([
            "hemolink",
            "auth",
            "register",
            "ayesha42",
            "--email",
            "a@example.org",
            "--password",
            "pw",
            "--blood-group",
            "C+",
            "--district",
            "Dhaka",
        ]);
        assert!(result.is_err());
    }
}
