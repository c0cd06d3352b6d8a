//! Admin-console commands. These run against the admin session scope,
//! isolated from the ordinary user session.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use hemolink_api::types::AdminUserUpdate;

use crate::auth_cli::BloodGroupArg;
use crate::{CliContext, print_json};

#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Log in to the admin console
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored admin session
    Logout,
    /// List platform users
    Users,
    /// Update a user record (absent flags clear the stored value)
    UpdateUser {
        user_id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        blood_group: Option<BloodGroupArg>,
        #[arg(long)]
        district: Option<String>,
        #[arg(long)]
        last_donation: Option<NaiveDate>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Remove a user
    DeleteUser { user_id: i64 },
    /// Platform analytics, admin view
    Analytics,
}

pub async fn run(context: &CliContext, args: AdminArgs) -> anyhow::Result<()> {
    let client = context.admin_client()?;
    match args.command {
        AdminCommands::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("admin logged in");
            Ok(())
        }
        AdminCommands::Logout => {
            client.logout();
            println!("admin logged out");
            Ok(())
        }
        AdminCommands::Users => {
            let users = client.users().await?;
            print_json(&users)
        }
        AdminCommands::UpdateUser {
            user_id,
            email,
            phone,
            blood_group,
            district,
            last_donation,
            active,
        } => {
            client
                .update_user(
                    user_id,
                    &AdminUserUpdate {
                        email,
                        phone,
                        blood_group: blood_group.map(|group| group.0.as_str().to_string()),
                        district,
                        last_donation,
                        is_active: active,
                    },
                )
                .await?;
            println!("user {user_id} updated");
            Ok(())
        }
        AdminCommands::DeleteUser { user_id } => {
            client.delete_user(user_id).await?;
            println!("user {user_id} removed");
            Ok(())
        }
        AdminCommands::Analytics => {
            let analytics = client.analytics().await?;
            print_json(&analytics)
        }
    }
}
