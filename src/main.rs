use admin_console::config::{Config, DEFAULT_CONFIG_FILE};
use admin_console::endpoints::Tier;
use admin_console::models::{Company, Currency, Role, User};
use admin_console::{AdminShell, LoadingObserver, Resource, RouteDecision};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Command line client for the admin dashboard API
#[derive(Parser)]
#[command(name = "admin-console", version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// API base URL (overrides file and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Token store location
    #[arg(long)]
    store: Option<PathBuf>,

    /// Language for this run: uz, ru or en
    #[arg(long)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the tokens
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_CONSOLE_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the current user and granted permissions
    Whoami,
    /// Print the navigation menu visible to the current user
    Nav,
    /// Search the menu
    Search { query: String },
    /// Check access to a dashboard page
    Open { path: String },
    /// Switch the stored language
    Locale { tag: String },
    Users {
        #[command(subcommand)]
        action: Action,
        /// Use the company-admin endpoints instead of the super-admin ones
        #[arg(long)]
        admin: bool,
    },
    Roles {
        #[command(subcommand)]
        action: Action,
    },
    Companies {
        #[command(subcommand)]
        action: Action,
        #[arg(long)]
        admin: bool,
    },
    Currencies {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand)]
enum Action {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
    },
    Show {
        id: u64,
    },
    Delete {
        id: u64,
    },
}

/// Busy indicator on stderr
#[derive(Default)]
struct TerminalOverlay {
    shown: AtomicBool,
}

impl LoadingObserver for TerminalOverlay {
    fn show(&self) {
        if !self.shown.swap(true, Ordering::SeqCst) {
            eprint!("loading... ");
            let _ = std::io::stderr().flush();
        }
    }

    fn hide(&self) {
        if self.shown.swap(false, Ordering::SeqCst) {
            eprintln!("done");
        }
    }
}

trait Row {
    fn row(&self) -> String;
}

impl Row for User {
    fn row(&self) -> String {
        format!("{:>5}  {:<30}  {:<9}  {}", self.id, self.email, self.kind.as_str(), self.display_name())
    }
}

impl Row for Role {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<20}  {:<9}  {} permission(s)",
            self.id,
            self.name,
            self.kind.as_str(),
            self.permissions.len()
        )
    }
}

impl Row for Company {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<24}  {}",
            self.id,
            self.name,
            self.company_name.as_deref().unwrap_or("-")
        )
    }
}

impl Row for Currency {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<5}  {:<4}  {:<20}  {}",
            self.id,
            self.code,
            self.symbol.as_deref().unwrap_or(""),
            self.country.as_deref().unwrap_or(""),
            if self.is_main { "main" } else { "" }
        )
    }
}

fn tier(admin: bool) -> Tier {
    if admin { Tier::Admin } else { Tier::SuperAdmin }
}

async fn run_action<T: DeserializeOwned + Row>(
    resource: Resource<'_, T>,
    action: Action,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        Action::List { page, per_page } => {
            let listing = resource.list(page, per_page).await?;
            for record in &listing.data {
                println!("{}", record.row());
            }
            println!("page {} of {}", page.max(1), listing.page_count());
        }
        Action::Show { id } => {
            println!("{}", resource.show(id).await?.row());
        }
        Action::Delete { id } => {
            resource.delete(id).await?;
            println!("deleted {}", id);
        }
    }
    Ok(())
}

/// Main entry point for the command line client
///
/// Loads configuration (file, environment, flags), builds the shell over the
/// on-disk token store, and runs one command.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or the first error
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if cli.locale.is_some() {
        config.locale = cli.locale;
    }
    config.validate()?;

    let mut shell = AdminShell::from_config(config)?;
    shell.loading().register(Arc::new(TerminalOverlay::default()));

    let result = run(&mut shell, cli.command).await;

    if shell.take_redirect() {
        println!("Session expired. Log in again with `admin-console login`.");
    }
    shell.loading().unregister();
    result
}

async fn run(shell: &mut AdminShell, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Login { email, password } => {
            let next = shell.login(&email, &password).await?;
            println!("Logged in. Continue at {}", next);
        }
        Command::Logout => {
            let next = shell.logout()?;
            println!("Logged out. Continue at {}", next);
        }
        Command::Whoami => {
            shell.bootstrap().await?;
            if let Some(user) = &shell.system().user {
                println!("{} <{}> ({})", user.display_name(), user.email, user.kind.as_str());
            }
            for permission in shell.granted() {
                println!("  {}", permission);
            }
        }
        Command::Nav => {
            shell.bootstrap().await?;
            for item in shell.visible_navigation() {
                println!("{}", item.title);
                for child in item.children.iter().flatten() {
                    println!("  {:<24} {}", child.title, child.path);
                }
            }
        }
        Command::Search { query } => {
            shell.bootstrap().await?;
            let palette = shell.search_palette();
            let hits = palette.search(&query);
            if hits.is_empty() {
                println!("No matches for {:?}", query);
            }
            for hit in hits {
                println!("{} / {:<24} {}", hit.parent_title, hit.title, hit.path);
            }
        }
        Command::Open { path } => {
            shell.bootstrap().await?;
            match shell.open_path(&path)? {
                RouteDecision::Allowed => println!("{}: allowed", path),
                RouteDecision::Forbidden => println!("{}: {}", path, shell.catalog().lookup("noPermission.title")),
                RouteDecision::RedirectToLogin => println!("{}: log in first", path),
                RouteDecision::Pending => println!("{}: still loading", path),
            }
        }
        Command::Locale { tag } => {
            let locale = shell.change_locale(&tag)?;
            println!("Language set to {}", locale);
        }
        Command::Users { action, admin } => {
            run_action(shell.api().users(tier(admin)).including("profile"), action).await?
        }
        Command::Roles { action } => run_action(shell.api().roles(), action).await?,
        Command::Companies { action, admin } => {
            run_action(shell.api().companies(tier(admin)), action).await?
        }
        Command::Currencies { action } => run_action(shell.api().currencies(), action).await?,
    }
    Ok(())
}
