//! Issue command - create, read and update tracker issues.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use fapiao_tracker::{IssueFields, TrackerClient, TrackerConfig};

/// Arguments for the issue command.
#[derive(Args)]
pub struct IssueArgs {
    #[command(subcommand)]
    command: IssueCommand,
}

#[derive(Subcommand)]
enum IssueCommand {
    /// Create an issue
    Create(CreateArgs),

    /// Print an issue with all fields as JSON
    Get {
        /// Issue key (e.g., "FIN-42")
        key: String,
    },

    /// Update an issue with a raw JSON body
    Update(UpdateArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// JSON file holding the issue fields
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// Project id
    #[arg(long)]
    project: Option<String>,

    /// Issue type id
    #[arg(long)]
    issuetype: Option<String>,

    /// Component id (repeatable)
    #[arg(long = "component")]
    components: Vec<String>,

    /// Issue title
    #[arg(long)]
    summary: Option<String>,

    /// Issue description
    #[arg(long)]
    description: Option<String>,

    /// Assignee user name
    #[arg(long)]
    assignee: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    /// Issue key
    key: String,

    /// JSON body
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    data: Option<String>,

    /// File holding the JSON body
    #[arg(long)]
    file: Option<PathBuf>,
}

pub async fn run(args: IssueArgs) -> anyhow::Result<()> {
    // Credentials may live in a .env file in the working directory
    dotenvy::dotenv().ok();
    let client = TrackerClient::new(&TrackerConfig::from_env()?)?;

    match args.command {
        IssueCommand::Create(create_args) => {
            let fields = build_fields(create_args)?;
            let created = client.create_issue(&fields).await?;
            println!(
                "{} Created {} ({})",
                style("✓").green(),
                style(&created.key).cyan().bold(),
                created.url
            );
        }
        IssueCommand::Get { key } => {
            let issue = client.get_issue(&key).await?;
            println!("{}", serde_json::to_string_pretty(&issue)?);
        }
        IssueCommand::Update(update_args) => {
            let body = match (&update_args.data, &update_args.file) {
                (Some(data), _) => data.clone(),
                (None, Some(file)) => fs::read_to_string(file)?,
                (None, None) => anyhow::bail!("Either --data or --file is required"),
            };
            let data: Value = serde_json::from_str(&body)?;
            client.update_issue(&update_args.key, &data).await?;
            println!("{} Updated {}", style("✓").green(), update_args.key);
        }
    }

    Ok(())
}

/// Fields from the optional JSON file, overridden by explicit flags.
fn build_fields(args: CreateArgs) -> anyhow::Result<IssueFields> {
    let mut fields = match &args.fields {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => IssueFields::default(),
    };

    if let Some(project) = args.project {
        fields.project = project;
    }
    if let Some(issuetype) = args.issuetype {
        fields.issuetype = issuetype;
    }
    if !args.components.is_empty() {
        fields.components = args.components;
    }
    if let Some(summary) = args.summary {
        fields.summary = summary;
    }
    if let Some(description) = args.description {
        fields.description = description;
    }
    if args.assignee.is_some() {
        fields.assignee = args.assignee;
    }

    if fields.project.is_empty() || fields.issuetype.is_empty() || fields.summary.is_empty() {
        anyhow::bail!("An issue needs a project, an issue type and a summary");
    }
    Ok(fields)
}
