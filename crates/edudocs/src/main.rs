//! # EduDocs CLI
//!
//! Opens one page against the configured API and prints what it shows.
//!
//! ```bash
//! EDUDOCS_API_URL=http://localhost:3000/api edudocs --role admin categories --sort documents --desc
//! edudocs documents --search fractions --status published
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use edudocs::config::AppConfig;
use edudocs::lifecycle::AppSystem;
use edudocs::model::{CategoryId, CategorySort, DocumentSort, DocumentStatus, Role};
use resource_store::tracing::setup_tracing;
use resource_store::{Direction, TracingNotifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the API (overrides EDUDOCS_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token (overrides EDUDOCS_API_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Signed-in role (overrides EDUDOCS_ROLE).
    #[arg(long)]
    role: Option<Role>,

    /// Request timeout in seconds (overrides EDUDOCS_TIMEOUT_SECS).
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories.
    Categories {
        #[arg(short, long)]
        search: Option<String>,
        /// Only active (true) or inactive (false) categories.
        #[arg(long)]
        active: Option<bool>,
        #[arg(long, value_enum, default_value_t = CategorySortArg::Name)]
        sort: CategorySortArg,
        #[arg(long)]
        desc: bool,
    },
    /// List documents.
    Documents {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        flagged: Option<bool>,
        #[arg(long, value_enum, default_value_t = DocumentSortArg::Created)]
        sort: DocumentSortArg,
        #[arg(long)]
        desc: bool,
    },
    /// Show the dashboard statistics for the role.
    Dashboard,
    /// Show the settings the role can see.
    Settings,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategorySortArg {
    Name,
    Documents,
    Created,
    Updated,
}

impl From<CategorySortArg> for CategorySort {
    fn from(arg: CategorySortArg) -> Self {
        match arg {
            CategorySortArg::Name => CategorySort::Name,
            CategorySortArg::Documents => CategorySort::DocumentCount,
            CategorySortArg::Created => CategorySort::CreatedAt,
            CategorySortArg::Updated => CategorySort::UpdatedAt,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocumentSortArg {
    Title,
    Created,
    Updated,
    Size,
    Downloads,
}

impl From<DocumentSortArg> for DocumentSort {
    fn from(arg: DocumentSortArg) -> Self {
        match arg {
            DocumentSortArg::Title => DocumentSort::Title,
            DocumentSortArg::Created => DocumentSort::CreatedAt,
            DocumentSortArg::Updated => DocumentSort::UpdatedAt,
            DocumentSortArg::Size => DocumentSort::FileSize,
            DocumentSortArg::Downloads => DocumentSort::Downloads,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Draft,
    Published,
    Archived,
}

impl From<StatusArg> for DocumentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => DocumentStatus::Draft,
            StatusArg::Published => DocumentStatus::Published,
            StatusArg::Archived => DocumentStatus::Archived,
        }
    }
}

fn direction(desc: bool) -> Direction {
    if desc {
        Direction::Descending
    } else {
        Direction::Ascending
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(token) = cli.token {
        config.api_token = Some(token);
    }
    if let Some(role) = cli.role {
        config.role = role;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs.max(1));
    }

    let system = AppSystem::connect(&config, Arc::new(TracingNotifier))
        .context("failed to set up the API client")?;

    // Screens hold client clones; they are dropped when `run` returns.
    let outcome = run(&system, cli.command).await;

    system.shutdown().await.context("a store task panicked")?;
    if let Err(e) = &outcome {
        error!(error = %e, "Command failed");
    }
    outcome
}

async fn run(system: &AppSystem, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Categories {
            search,
            active,
            sort,
            desc,
        } => {
            let mut screen = system.categories_screen();
            screen.mount().await?;
            if let Some(text) = search {
                screen.search(text);
            }
            screen.filter_active(active);
            screen.sort_by(sort.into(), direction(desc));

            for c in screen.visible() {
                let status = if c.is_active { "active" } else { "inactive" };
                println!("{:<12} {:<30} {:>5} docs  {}", c.id, c.name, c.document_count, status);
            }
        }
        Command::Documents {
            search,
            category,
            status,
            flagged,
            sort,
            desc,
        } => {
            let mut screen = system.documents_screen();
            screen.mount().await?;
            if let Some(text) = search {
                screen.search(text);
            }
            screen.filter_category(category.map(|c| CategoryId::from(c.as_str())));
            screen.filter_status(status.map(Into::into));
            screen.filter_flagged(flagged);
            screen.sort_by(sort.into(), direction(desc));

            for d in screen.visible() {
                let flag = if d.is_flagged { "FLAGGED" } else { "" };
                println!(
                    "{:<12} {:<40} {:<20} {:<10} {}",
                    d.id,
                    d.title,
                    screen.category_name(&d),
                    d.status,
                    flag
                );
            }
        }
        Command::Dashboard => {
            let screen = system.dashboard_screen();
            screen.mount().await?;
            if let Some(stats) = screen.stats() {
                for (label, value) in stats.rows() {
                    println!("{label:<20} {value}");
                }
            }
        }
        Command::Settings => {
            let screen = system.settings_screen();
            screen.mount().await?;
            if let Some(s) = screen.system() {
                println!("{s:#?}");
            }
            if let Some(s) = screen.security() {
                println!("{s:#?}");
            }
            if let Some(s) = screen.notifications() {
                println!("{s:#?}");
            }
            for log in screen.activity_logs() {
                println!(
                    "{}  {:<20} {:<16} {}",
                    log.created_at.format("%Y-%m-%d %H:%M"),
                    log.user_name,
                    log.action,
                    log.target
                );
            }
        }
    }
    info!("Done");
    Ok(())
}
