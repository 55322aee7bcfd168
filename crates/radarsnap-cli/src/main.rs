//! Radarsnap command-line client.
//!
//! Sessions persist in a file store under the user's config directory,
//! so `radarsnap login` once and every later invocation reuses (and
//! transparently refreshes) the stored tokens.

mod file_store;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};

use radarsnap_models::{
    CreateProjectRequest, DashboardQuery, InviteTeamMemberRequest, ProjectRole, RegisterRequest,
    SessionsQuery,
};
use radarsnap_sdk::{ApiClient, ClientConfig};

use crate::file_store::FileStore;

#[derive(Parser)]
#[command(name = "radarsnap")]
#[command(about = "Radarsnap analytics from the terminal")]
#[command(author, version, long_about = None)]
struct Cli {
    /// API base URL (overrides RADARSNAP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change the account password
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Project and team management
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Dashboard overview for the selected project
    Dashboard(WindowArgs),
    /// List captured sessions
    Sessions {
        #[command(flatten)]
        window: WindowArgs,
        /// Filter by device class (desktop / mobile / tablet)
        #[arg(long)]
        device: Option<String>,
        /// Filter by browser name
        #[arg(long)]
        browser: Option<String>,
        /// Filter by ISO country code
        #[arg(long)]
        country: Option<String>,
    },
    /// Page performance aggregates
    Performance(WindowArgs),
    /// Captured-error summary
    Errors(WindowArgs),
    /// Global ingestion counters
    Stats,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List your projects
    List,
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    /// Select the working project
    Use { project_id: String },
    /// List project members
    Members {
        #[arg(long)]
        project: Option<String>,
    },
    /// Invite someone to the project
    Invite {
        #[arg(long)]
        email: String,
        /// Role to grant (admin / developer / viewer)
        #[arg(long)]
        role: ProjectRole,
        #[arg(long)]
        project: Option<String>,
    },
    /// Replace the project's ingestion API key
    RegenerateKey {
        #[arg(long)]
        project: Option<String>,
    },
}

/// Time-window options shared by the dashboard commands.
#[derive(Args)]
struct WindowArgs {
    /// Project id (defaults to the selected project)
    #[arg(long)]
    project: Option<String>,
    /// Inclusive window start (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,
    /// Inclusive window end (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,
    /// IANA timezone for day bucketing
    #[arg(long)]
    timezone: Option<String>,
}

impl WindowArgs {
    fn query(&self) -> DashboardQuery {
        DashboardQuery {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            timezone: self.timezone.clone(),
        }
    }
}

fn build_client(api_url: Option<String>) -> anyhow::Result<ApiClient> {
    let store = FileStore::default_location().context("opening session store")?;
    let config = match api_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    }
    .with_store(Arc::new(store))
    .with_auth_terminal_hook(Box::new(|| {
        eprintln!("session expired: run `radarsnap login` to sign in again");
    }));
    Ok(ApiClient::new(config)?)
}

/// Resolve the project to operate on: explicit flag first, then the
/// stored selection.
fn resolve_project(client: &ApiClient, flag: Option<String>) -> anyhow::Result<String> {
    if let Some(id) = flag {
        return Ok(id);
    }
    match client.projects().selected()? {
        Some(id) => Ok(id),
        None => bail!("no project selected; pass --project or run `radarsnap projects use <id>`"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = build_client(cli.api_url)?;

    match cli.command {
        Commands::Login { email, password } => {
            let session = client.auth().login(&email, &password).await?;
            println!(
                "logged in as {} {} <{}>",
                session.user.first_name, session.user.last_name, session.user.email
            );
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let session = client.auth().register(&request).await?;
            println!("account created for {}", session.user.email);
        }
        Commands::Logout => {
            client.auth().logout().await?;
            println!("logged out");
        }
        Commands::Whoami => match client.store().user()? {
            Some(user) => println!(
                "{} {} <{}> (id {})",
                user.first_name, user.last_name, user.email, user.id
            ),
            None => println!("not logged in"),
        },
        Commands::ChangePassword { old, new } => {
            let response = client.auth().change_password(&old, &new).await?;
            println!("{}", response.message);
        }
        Commands::Projects { command } => run_projects(&client, command).await?,
        Commands::Dashboard(window) => {
            let project = resolve_project(&client, window.project.clone())?;
            let overview = client.analytics().dashboard(&project, &window.query()).await?;
            println!("sessions:        {}", overview.total_sessions);
            println!("page views:      {}", overview.total_page_views);
            println!("events:          {}", overview.total_events);
            println!("unique visitors: {}", overview.unique_visitors);
            println!("avg duration:    {:.1}s", overview.avg_session_duration);
            println!("bounce rate:     {:.0}%", overview.bounce_rate * 100.0);
            println!();
            println!("top pages:");
            for page in &overview.top_pages {
                println!("  {:>6}  {}", page.views, page.page_url);
            }
        }
        Commands::Sessions {
            window,
            device,
            browser,
            country,
        } => {
            let project = resolve_project(&client, window.project.clone())?;
            let query = SessionsQuery {
                window: window.query(),
                device_type: device,
                browser,
                country,
                ..SessionsQuery::default()
            };
            let page = client.analytics().sessions(&project, &query).await?;
            println!("{} sessions", page.count);
            for s in &page.results {
                println!(
                    "  {}  {:<8} {:<8} {:>2} pages  {:>5.0}s  {}",
                    s.started_at.format("%Y-%m-%d %H:%M"),
                    s.device_type,
                    s.browser,
                    s.page_views,
                    s.duration,
                    s.session_id
                );
            }
        }
        Commands::Performance(window) => {
            let project = resolve_project(&client, window.project.clone())?;
            let metrics = client
                .analytics()
                .performance(&project, &window.query())
                .await?;
            println!("avg page load: {:.0}ms", metrics.avg_page_load_time);
            println!("avg FCP:       {:.0}ms", metrics.avg_first_contentful_paint);
            println!("avg TTI:       {:.0}ms", metrics.avg_time_to_interactive);
            println!("slowest pages:");
            for page in &metrics.slow_pages {
                println!("  {:>7.0}ms  {}", page.avg_load_time, page.page_url);
            }
        }
        Commands::Errors(window) => {
            let project = resolve_project(&client, window.project.clone())?;
            let summary = client.analytics().errors(&project, &window.query()).await?;
            println!(
                "{} errors ({} unique, {} users affected)",
                summary.total_errors, summary.unique_errors, summary.affected_users
            );
            for error in &summary.recent_errors {
                println!(
                    "  [{}] {}x  {}",
                    error.error_type, error.occurrences, error.error_message
                );
            }
        }
        Commands::Stats => {
            let stats = client.analytics().stats().await?;
            println!("events:   {} total, {} today", stats.total_events, stats.events_today);
            println!(
                "sessions: {} total, {} today",
                stats.total_sessions, stats.sessions_today
            );
            if let Some(last) = stats.last_event_at {
                println!("last event: {last}");
            }
        }
    }

    Ok(())
}

async fn run_projects(client: &ApiClient, command: ProjectCommands) -> anyhow::Result<()> {
    match command {
        ProjectCommands::List => {
            let page = client.projects().list().await?;
            let selected = client.projects().selected()?;
            for project in &page.results {
                let marker = if selected.as_deref() == Some(project.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                let role = project
                    .role
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{marker} {}  {:<24} {:<10} {}", project.id, project.name, role, project.website_url);
            }
        }
        ProjectCommands::Create { name, url } => {
            let project = client
                .projects()
                .create(&CreateProjectRequest {
                    name,
                    website_url: url,
                })
                .await?;
            println!("created project {} (api key {})", project.id, project.api_key);
        }
        ProjectCommands::Use { project_id } => {
            // Validate before persisting the selection.
            let project = client.projects().get(&project_id).await?;
            client.projects().select(&project.id)?;
            println!("using project {} ({})", project.name, project.id);
        }
        ProjectCommands::Members { project } => {
            let project = resolve_project(client, project)?;
            let members = client.projects().members(&project).await?;
            for member in &members {
                println!(
                    "  {:<10} {} {} <{}>",
                    member.role.to_string(),
                    member.user.first_name,
                    member.user.last_name,
                    member.user.email
                );
            }
        }
        ProjectCommands::Invite {
            email,
            role,
            project,
        } => {
            let project = resolve_project(client, project)?;
            let invitation = client
                .projects()
                .invite(&project, &InviteTeamMemberRequest { email, role })
                .await?;
            println!(
                "invited {} as {} (invitation {})",
                invitation.email, invitation.role, invitation.id
            );
        }
        ProjectCommands::RegenerateKey { project } => {
            let project = resolve_project(client, project)?;
            let response = client.projects().regenerate_api_key(&project).await?;
            println!("new api key: {}", response.api_key);
        }
    }
    Ok(())
}
