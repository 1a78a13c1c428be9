// Command-line client for a running Frameboard API server.
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "fb", about = "Frameboard API command-line client", version)]
pub struct Cli {
    /// Base URL of a running Frameboard API server
    #[arg(long, global = true, default_value = "http://127.0.0.1:3000")]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Column operations")]
    Columns {
        #[command(subcommand)]
        cmd: EntityCommands,
    },

    #[command(about = "Ticket operations")]
    Tickets {
        #[command(subcommand)]
        cmd: EntityCommands,
    },

    #[command(name = "ticket-assignees", about = "Ticket assignment operations")]
    TicketAssignees {
        #[command(subcommand)]
        cmd: EntityCommands,
    },

    #[command(about = "User operations")]
    Users {
        #[command(subcommand)]
        cmd: EntityCommands,
    },

    #[command(about = "Assign a user to a ticket")]
    Assign {
        #[arg(help = "Ticket id")]
        ticket_id: String,
        #[arg(help = "User id")]
        user_id: String,
    },

    #[command(about = "Show the signed-in session user")]
    Whoami,

    #[command(about = "List users collaborating on a frame")]
    Collaborators {
        #[arg(help = "Frame id")]
        frame_id: String,
    },

    #[command(name = "non-collaborators", about = "List users not collaborating on a frame")]
    NonCollaborators {
        #[arg(help = "Frame id")]
        frame_id: String,
    },

    #[command(about = "Server health")]
    Health,
}

#[derive(Subcommand)]
pub enum EntityCommands {
    #[command(about = "List records")]
    List,

    #[command(about = "Get a record by id")]
    Get {
        #[arg(help = "Record id")]
        id: String,
    },

    #[command(about = "Create a record from a JSON argument")]
    Create {
        #[arg(help = "JSON payload")]
        json: String,
    },

    #[command(about = "Update a record from a JSON argument")]
    Update {
        #[arg(help = "Record id")]
        id: String,
        #[arg(help = "JSON payload")]
        json: String,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record id")]
        id: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli { server, command } = cli;
    let client = reqwest::Client::new();

    match command {
        Commands::Columns { cmd } => entity(&client, &server, "columns", cmd).await,
        Commands::Tickets { cmd } => entity(&client, &server, "tickets", cmd).await,
        Commands::TicketAssignees { cmd } => {
            entity(&client, &server, "ticket_assignees", cmd).await
        }
        Commands::Users { cmd } => entity(&client, &server, "users", cmd).await,
        Commands::Assign { ticket_id, user_id } => {
            let url = format!("{}/api/tickets/{}/assignees", server, ticket_id);
            let resp = client
                .post(&url)
                .json(&serde_json::json!({ "user_id": user_id }))
                .send()
                .await?;
            print_response(resp).await
        }
        Commands::Whoami => {
            let resp = client.get(format!("{}/api/users/me", server)).send().await?;
            print_response(resp).await
        }
        Commands::Collaborators { frame_id } => {
            let url = format!("{}/api/frames/{}/collaborators", server, frame_id);
            print_response(client.get(&url).send().await?).await
        }
        Commands::NonCollaborators { frame_id } => {
            let url = format!("{}/api/frames/{}/non_collaborators", server, frame_id);
            print_response(client.get(&url).send().await?).await
        }
        Commands::Health => {
            let resp = client.get(format!("{}/health", server)).send().await?;
            print_response(resp).await
        }
    }
}

async fn entity(
    client: &reqwest::Client,
    server: &str,
    entity: &str,
    cmd: EntityCommands,
) -> anyhow::Result<()> {
    let base = format!("{}/api/{}", server, entity);
    let resp = match cmd {
        EntityCommands::List => client.get(&base).send().await?,
        EntityCommands::Get { id } => client.get(format!("{}/{}", base, id)).send().await?,
        EntityCommands::Create { json } => {
            let payload: Value = serde_json::from_str(&json).context("invalid JSON payload")?;
            client.post(&base).json(&payload).send().await?
        }
        EntityCommands::Update { id, json } => {
            let payload: Value = serde_json::from_str(&json).context("invalid JSON payload")?;
            client.patch(format!("{}/{}", base, id)).json(&payload).send().await?
        }
        EntityCommands::Delete { id } => {
            client.delete(format!("{}/{}", base, id)).send().await?
        }
    };
    print_response(resp).await
}

async fn print_response(resp: reqwest::Response) -> anyhow::Result<()> {
    let status = resp.status();
    let text = resp.text().await?;

    if text.is_empty() {
        println!("{}", status);
    } else {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            Err(_) => println!("{}", text),
        }
    }

    if !status.is_success() {
        anyhow::bail!("request failed with {}", status);
    }
    Ok(())
}
