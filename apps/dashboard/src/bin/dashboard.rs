use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use hiring_dashboard::config::ClientConfig;
use hiring_dashboard::dashboard::export::{email_text, shortlist_json};
use hiring_dashboard::dashboard::{
    ApiClient, DashboardSession, FileShortlistStorage, ShortlistError, ShortlistManager, SortMode,
    Toggled, SHORTLIST_CAPACITY,
};
use hiring_dashboard::models::candidate::{Candidate, WorkExperience};
use hiring_dashboard::telemetry;

type Session = DashboardSession<FileShortlistStorage>;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Candidate dashboard - browse, shortlist, and export hires")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidates
    List {
        /// Search name or "role company"
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only show candidates with this availability (full-time, part-time)
        #[arg(short, long)]
        availability: Option<String>,

        /// Sort mode (none, experience)
        #[arg(short, long, default_value = "none")]
        sort: SortMode,
    },

    /// Add a candidate
    Add {
        /// Full name
        name: String,

        /// Availability tag; repeat for several
        #[arg(short, long)]
        availability: Vec<String>,

        /// Work experience as "Role@Company"; repeat for several
        #[arg(short, long)]
        experience: Vec<String>,
    },

    /// Set the server-side reason for a candidate
    Reason {
        /// Candidate id
        id: String,
        reason: String,
    },

    /// Manage the local shortlist
    Shortlist {
        #[command(subcommand)]
        command: ShortlistCommands,
    },

    /// Export the shortlist
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[derive(Subcommand)]
enum ShortlistCommands {
    /// Show shortlisted candidates
    Show,

    /// Add or remove a candidate
    Toggle {
        /// Candidate id
        id: String,
    },

    /// Set the reason on a shortlist entry, adding the candidate if needed
    Note {
        /// Candidate id
        id: String,
        reason: String,
    },

    /// Remove a candidate from the shortlist
    Remove {
        /// Candidate id
        id: String,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Write the shortlist as JSON
    Json {
        #[arg(short, long, default_value = "shortlist.json")]
        out: PathBuf,
    },

    /// Print the shortlist as email text
    Email,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    telemetry::init(env!("CARGO_CRATE_NAME"), &config.rust_log);

    let shortlist = ShortlistManager::load(FileShortlistStorage::new(&config.shortlist_file));
    let mut session = DashboardSession::new(ApiClient::new(&config.api_url), shortlist);

    match cli.command {
        Commands::List {
            query,
            availability,
            sort,
        } => {
            session.filter.query = query;
            session.filter.availability = availability;
            session.filter.sort = sort;
            load(&mut session).await?;
            print_listing(&session);
        }

        Commands::Add {
            name,
            availability,
            experience,
        } => {
            session.form.name = name;
            for tag in &availability {
                session.form.toggle_availability(tag);
            }
            session.form.experiences = experience
                .iter()
                .map(|raw| parse_experience(raw))
                .collect();
            let stored = session.submit(Instant::now()).await;
            check_error(&session)?;
            if let (Some(candidate), Some(notice)) = (stored, session.success()) {
                println!("{} (id {})", notice.text, candidate.id);
            }
        }

        Commands::Reason { id, reason } => {
            let updated = session.save_server_reason(&id, &reason).await;
            check_error(&session)?;
            if let Some(candidate) = updated {
                println!("Reason updated for {}", candidate.name);
            }
        }

        Commands::Shortlist { command } => run_shortlist(&mut session, command).await?,

        Commands::Export { command } => {
            let entries = session.shortlist.entries();
            if entries.is_empty() {
                bail!("Shortlist is empty");
            }
            match command {
                ExportCommands::Json { out } => {
                    let body = shortlist_json(entries)?;
                    std::fs::write(&out, body)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    println!("Wrote {} entries to {}", entries.len(), out.display());
                }
                ExportCommands::Email => println!("{}", email_text(entries)),
            }
        }
    }

    Ok(())
}

async fn run_shortlist(session: &mut Session, command: ShortlistCommands) -> Result<()> {
    match command {
        ShortlistCommands::Show => print_shortlist(session),
        ShortlistCommands::Toggle { id } => {
            let candidate = fetch_candidate(session, &id).await?;
            match session.shortlist.toggle(&candidate) {
                Ok(Toggled::Added) => println!("Shortlisted {}", candidate.name),
                Ok(Toggled::Removed) => println!("Removed {}", candidate.name),
                Err(e @ ShortlistError::Full { .. }) => bail!("{e}"),
                Err(e) => return Err(e.into()),
            }
            print_shortlist(session);
        }
        ShortlistCommands::Note { id, reason } => {
            let candidate = match session.shortlist.get(&id) {
                Some(entry) => entry.candidate.clone(),
                None => fetch_candidate(session, &id).await?,
            };
            session.shortlist.note(&candidate, &reason)?;
            print_shortlist(session);
        }
        ShortlistCommands::Remove { id } => {
            session.shortlist.remove(&id)?;
            print_shortlist(session);
        }
    }
    Ok(())
}

async fn load(session: &mut Session) -> Result<()> {
    session.refresh().await;
    check_error(session)
}

async fn fetch_candidate(session: &mut Session, id: &str) -> Result<Candidate> {
    load(session).await?;
    session
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("No candidate with id {id}"))
}

fn check_error(session: &Session) -> Result<()> {
    match session.error() {
        Some(notice) => bail!("{}", notice.text),
        None => Ok(()),
    }
}

/// "Role@Company" -> row; a missing '@' means role only.
fn parse_experience(raw: &str) -> WorkExperience {
    let (role, company) = raw.split_once('@').unwrap_or((raw, ""));
    WorkExperience {
        role: role.to_string(),
        company: company.to_string(),
    }
}

fn print_listing(session: &Session) {
    let view = session.view();
    println!("{} candidates", view.len());

    let top = session.top_candidates();
    if !top.is_empty() {
        println!();
        println!("Top {} Candidates", top.len());
        for (i, c) in top.iter().enumerate() {
            println!("  {}. {} — {} experiences", i + 1, c.name, c.experience_count());
        }
    }

    for c in &view {
        println!();
        let marker = if session.shortlist.contains(&c.id) { "*" } else { " " };
        let created = chrono::DateTime::parse_from_rfc3339(&c.created_at)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("{marker} [{}] {}  {created}", c.id, c.name);
        if !c.work_availability.is_empty() {
            println!("    {}", c.work_availability.join(", "));
        }
        for w in c.work_experiences.iter().take(5) {
            if w.company.is_empty() {
                println!("    - {}", w.role);
            } else {
                println!("    - {} @ {}", w.role, w.company);
            }
        }
    }
}

fn print_shortlist(session: &Session) {
    let entries = session.shortlist.entries();
    println!("Shortlist ({}/{SHORTLIST_CAPACITY})", entries.len());
    if entries.is_empty() {
        println!("No shortlisted candidates yet.");
    }
    for entry in entries {
        println!(
            "  [{}] {}  {}",
            entry.id(),
            entry.name(),
            entry.candidate.work_availability.join(", ")
        );
        println!("      Reason: {}", entry.reason());
    }
}
