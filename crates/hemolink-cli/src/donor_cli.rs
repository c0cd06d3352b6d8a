//! Donor directory commands.

use clap::{Args, Subcommand};
use hemolink_api::DonorSearchFilter;
use hemolink_api::types::DonorMessage;

use crate::auth_cli::BloodGroupArg;
use crate::{CliContext, print_json};

#[derive(Args)]
pub struct DonorArgs {
    #[command(subcommand)]
    pub command: DonorCommands,
}

#[derive(Subcommand)]
pub enum DonorCommands {
    /// List the donor directory
    List,
    /// Search donors by blood group and/or district
    Search {
        #[arg(long)]
        blood_group: Option<BloodGroupArg>,
        #[arg(long)]
        district: Option<String>,
    },
    /// Send a contact message to a donor
    Message {
        donor_id: i64,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        message: String,
    },
}

pub async fn run(context: &CliContext, args: DonorArgs) -> anyhow::Result<()> {
    let client = context.user_client()?;
    match args.command {
        DonorCommands::List => {
            let donors = client.donors().await?;
            print_json(&donors)
        }
        DonorCommands::Search {
            blood_group,
            district,
        } => {
            let donors = client
                .search_donors(&DonorSearchFilter {
                    blood_group: blood_group.map(|group| group.0),
                    district,
                })
                .await?;
            if donors.is_empty() {
                println!("no donors found");
                return Ok(());
            }
            print_json(&donors)
        }
        DonorCommands::Message {
            donor_id,
            contact,
            message,
        } => {
            client
                .message_donor(donor_id, &DonorMessage { contact, message })
                .await?;
            println!("message sent");
            Ok(())
        }
    }
}
