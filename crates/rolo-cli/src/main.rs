//! `rolo` — command-line client for the Rolo contacts server.
//!
//! # Usage
//!
//! ```text
//! rolo --url http://localhost:8000 list --query ann
//! rolo add --first-name Ann --last-name Lee --email a@x.com \
//!          --phone "+1 555 000 0001" --birthday 1990-06-05
//! rolo birthdays --days 14
//! ```

mod client;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use rolo_core::{
  contact::{Contact, ContactId, NewContact},
  email::Email,
  phone::PhoneNumber,
  store::DEFAULT_PAGE_LIMIT,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolo", about = "Command-line client for the Rolo contacts server")]
struct Cli {
  /// Path to a TOML config file (`url = "..."`).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the rolo server (default: http://localhost:8000).
  #[arg(long, env = "ROLO_URL")]
  url: Option<String>,

  /// Print raw JSON instead of one line per contact.
  #[arg(long)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List contacts, optionally filtered by name or email.
  List {
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long, default_value_t = 0)]
    skip:  u64,
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u64,
  },
  /// Show one contact.
  Get { id: ContactId },
  /// Create a contact.
  Add(ContactArgs),
  /// Replace every field of a contact.
  Update {
    id:       ContactId,
    #[command(flatten)]
    contact:  ContactArgs,
  },
  /// Delete a contact.
  Delete { id: ContactId },
  /// Contacts with a birthday in the coming days.
  Birthdays {
    /// Look-ahead in days (server default if omitted).
    #[arg(long)]
    days: Option<u32>,
  },
}

#[derive(Args, Debug)]
struct ContactArgs {
  #[arg(long)]
  first_name: String,
  #[arg(long)]
  last_name:  String,
  #[arg(long)]
  email:      String,
  #[arg(long)]
  phone:      String,
  /// Calendar date, YYYY-MM-DD.
  #[arg(long)]
  birthday:   NaiveDate,
}

impl TryFrom<ContactArgs> for NewContact {
  type Error = rolo_core::Error;

  fn try_from(a: ContactArgs) -> Result<Self, Self::Error> {
    Ok(NewContact {
      first_name:   a.first_name,
      last_name:    a.last_name,
      email:        Email::new(a.email)?,
      phone_number: PhoneNumber::new(a.phone)?,
      birthday:     a.birthday,
    })
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag (or `ROLO_URL`) overrides the config file, which overrides the
/// default.
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let base_url = resolve_url(cli.url, &file_cfg);
  tracing::debug!(%base_url, "using server");
  let client = ApiClient::new(ApiConfig { base_url })?;

  let contacts = match cli.command {
    Command::List { query, skip, limit } => {
      client.list(query.as_deref(), skip, limit).await?
    }
    Command::Get { id } => vec![client.get(id).await?],
    Command::Add(args) => {
      let input = NewContact::try_from(args).context("invalid contact")?;
      vec![client.create(&input).await?]
    }
    Command::Update { id, contact } => {
      let input = NewContact::try_from(contact).context("invalid contact")?;
      vec![client.update(id, &input).await?]
    }
    Command::Delete { id } => vec![client.delete(id).await?],
    Command::Birthdays { days } => client.birthdays(days).await?,
  };

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&contacts)?);
  } else {
    for contact in &contacts {
      println!("{}", format_line(contact));
    }
  }
  Ok(())
}

fn format_line(c: &Contact) -> String {
  format!(
    "{:>5}  {:<24}  {:<28}  {:<18}  {}",
    c.id,
    c.full_name(),
    c.email,
    c.phone_number,
    c.birthday,
  )
}
