//! Hospital inventory and donation-history commands.

use clap::{Args, Subcommand};
use hemolink_api::types::{DonationCreate, InventoryUpsert};

use crate::auth_cli::BloodGroupArg;
use crate::{CliContext, print_json};

#[derive(Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommands,
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// List blood inventory across hospitals
    List,
    /// Add or update an inventory entry
    Add {
        #[arg(long)]
        hospital: String,
        #[arg(long)]
        blood_group: BloodGroupArg,
        #[arg(long)]
        units: u32,
    },
    /// List the caller's donation history
    Donations,
    /// Record a donation
    Donate {
        #[arg(long)]
        hospital: String,
        #[arg(long)]
        blood_group: BloodGroupArg,
        #[arg(long)]
        units: u32,
    },
}

pub async fn run(context: &CliContext, args: InventoryArgs) -> anyhow::Result<()> {
    let client = context.user_client()?;
    match args.command {
        InventoryCommands::List => {
            let inventory = client.inventory().await?;
            print_json(&inventory)
        }
        InventoryCommands::Add {
            hospital,
            blood_group,
            units,
        } => {
            client
                .upsert_inventory(&InventoryUpsert {
                    hospital,
                    blood_group: blood_group.0.as_str().to_string(),
                    units_available: units,
                })
                .await?;
            println!("inventory updated");
            Ok(())
        }
        InventoryCommands::Donations => {
            let donations = client.donations().await?;
            print_json(&donations)
        }
        InventoryCommands::Donate {
            hospital,
            blood_group,
            units,
        } => {
            client
                .record_donation(&DonationCreate {
                    blood_group: blood_group.0.as_str().to_string(),
                    hospital,
                    units_donated: units,
                })
                .await?;
            println!("donation recorded");
            Ok(())
        }
    }
}
