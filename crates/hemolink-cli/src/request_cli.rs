//! Blood-request commands.

use clap::{Args, Subcommand};
use hemolink_api::types::BloodRequestCreate;

use crate::auth_cli::BloodGroupArg;
use crate::{CliContext, print_json};

#[derive(Args)]
pub struct RequestArgs {
    #[command(subcommand)]
    pub command: RequestCommands,
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Create a blood request
    Create {
        #[arg(long)]
        blood_group: BloodGroupArg,
        #[arg(long)]
        contact_info: String,
        #[arg(long)]
        hospital: Option<String>,
        #[arg(long)]
        cause: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List the caller's own requests
    Mine,
    /// Accept an open request as a donor
    Accept { request_id: i64 },
    /// Mark an accepted request as collected
    Collected { request_id: i64 },
    /// List request notifications
    Notifications,
}

pub async fn run(context: &CliContext, args: RequestArgs) -> anyhow::Result<()> {
    let client = context.user_client()?;
    match args.command {
        RequestCommands::Create {
            blood_group,
            contact_info,
            hospital,
            cause,
            address,
        } => {
            client
                .create_request(&BloodRequestCreate {
                    blood_group: blood_group.0.as_str().to_string(),
                    hospital,
                    cause,
                    address,
                    contact_info,
                })
                .await?;
            println!("request created");
            Ok(())
        }
        RequestCommands::Mine => {
            let requests = client.my_requests().await?;
            print_json(&requests)
        }
        RequestCommands::Accept { request_id } => {
            client.accept_request(request_id).await?;
            println!("request accepted; contact the requester with the provided info");
            Ok(())
        }
        RequestCommands::Collected { request_id } => {
            client.mark_request_collected(request_id).await?;
            println!("request marked collected");
            Ok(())
        }
        RequestCommands::Notifications => {
            let notifications = client.notifications().await?;
            print_json(&notifications)
        }
    }
}
