//! Intake binary entry point

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};

use intake::{
    AuthService, CatalogService, FileSessionStore, IntakeConfig, IntakeError, IntakeResult,
    OrderLine, RealApiClient, RealAuthService, RealCatalogService, RealCustomerService,
    RealOrderService, Reconciler, TokenStatus,
};
use shared::{component_error, component_info, logging, DraftDetail, SessionContext};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Turn free-text produce orders into draft order items")]
struct Args {
    /// Backend base URL (overrides KIVI_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Check the stored session against the backend
    Whoami,
    /// Look up catalog products by name
    Suggest { query: String },
    /// Parse an order message and reconcile it into the draft
    Parse(ParseArgs),
    /// Inspect or confirm the draft order
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(ClapArgs)]
struct ParseArgs {
    /// File holding the pasted order messages
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Order text given inline
    #[arg(long)]
    text: Option<String>,

    /// Customer assigned to every line
    #[arg(long)]
    customer: Option<String>,

    /// Resolve non-exact lines to their best suggestion
    #[arg(long)]
    accept_top: bool,

    /// Save the reconciled lines to the draft order
    #[arg(long)]
    submit: bool,

    /// Save the lines and confirm the draft into an order
    #[arg(long)]
    emit: bool,
}

#[derive(Subcommand)]
enum DraftAction {
    Show,
    Confirm,
}

const COMPONENT: &str = "intake";

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match IntakeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let config = match &args.api_url {
        Some(url) => config.with_api_url(url.clone()),
        None => config,
    };
    let log_level = args.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    logging::init_tracing_with_level(Some(&log_level));
    component_info!(COMPONENT, api_url = %config.api_url, "Order intake starting");

    if let Err(e) = run(args.command, config).await {
        component_error!(COMPONENT, error = %e, "Command failed: {}", e);
        if let IntakeError::IncompleteBatchError { .. } = e {
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}

async fn run(command: Command, config: IntakeConfig) -> IntakeResult<()> {
    config.validate()?;

    let session = Arc::new(SessionContext::new());
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let api = RealApiClient::new(&config.api_url, config.http_timeout, Arc::clone(&session))?;
    let auth = RealAuthService::new(api.clone(), Arc::clone(&store));
    auth.restore().await?;

    match command {
        Command::Login { email, password } => {
            let session = auth.login(&email, &password).await?;
            component_info!(COMPONENT, "Signed in as {}", session.user_type);
        }
        Command::Logout => {
            auth.logout().await?;
            component_info!(COMPONENT, "Signed out");
        }
        Command::Whoami => match auth.verify().await? {
            TokenStatus::Valid { user } => {
                let user_type = session.user_type().await;
                match user {
                    Some(user) => println!("Signed in ({user_type}): {user}"),
                    None => println!("Signed in ({user_type})"),
                }
            }
            TokenStatus::Invalid { reason } => println!("Not signed in: {reason}"),
            TokenStatus::Unverified { error } => println!("Session kept, verification failed: {error}"),
        },
        Command::Suggest { query } => {
            let catalog = RealCatalogService::new(api);
            for suggestion in catalog.suggest(&query).await? {
                println!("{:>6}  {:<30} {:>5.1}%", suggestion.id, suggestion.name, suggestion.score * 100.0);
            }
        }
        Command::Parse(parse) => {
            let reconciler = build_reconciler(&config, api);
            run_parse(&reconciler, parse).await?;
        }
        Command::Draft { action } => {
            let reconciler = build_reconciler(&config, api);
            match action {
                DraftAction::Show => print_draft(&reconciler.refresh_draft().await?),
                DraftAction::Confirm => {
                    reconciler.confirm_draft().await?;
                    if let Some(draft) = reconciler.draft().await {
                        print_draft(&draft);
                    }
                }
            }
        }
    }
    Ok(())
}

fn build_reconciler(
    config: &IntakeConfig,
    api: RealApiClient,
) -> Reconciler<RealOrderService, RealCatalogService, RealCustomerService> {
    Reconciler::new(
        config.reconciler.clone(),
        RealOrderService::new(api.clone()),
        RealCatalogService::new(api.clone()),
        RealCustomerService::new(api),
    )
}

async fn run_parse<O, C, U>(reconciler: &Reconciler<O, C, U>, args: ParseArgs) -> IntakeResult<()>
where
    O: intake::OrderService,
    C: intake::CatalogService + 'static,
    U: intake::CustomerService,
{
    let text = match (args.file, args.text) {
        (Some(path), _) => tokio::fs::read_to_string(path).await?,
        (None, Some(text)) => text,
        (None, None) => return Err(IntakeError::validation("Provide --file or --text")),
    };

    if let Err(e) = reconciler.load_catalog().await {
        component_error!(COMPONENT, error = %e, "Catalog load failed, resolving without it");
    }

    let lines = reconciler.parse_text(&text).await?;
    component_info!(COMPONENT, lines = lines.len(), "Parsed order text");

    if args.accept_top {
        for line in reconciler.unresolved().await {
            if reconciler.accept_top_suggestion(line.line_index).await? {
                component_info!(COMPONENT, line = %line.line_index, "Resolved to top suggestion");
            }
        }
    }
    if let Some(customer) = args.customer {
        reconciler.assign_customer_to_all(&customer).await;
    }
    reconciler.refresh_pricing().await;

    print_lines(&reconciler.lines().await);

    if args.emit {
        reconciler.emit_draft().await?;
        component_info!(COMPONENT, "Draft confirmed into an order");
    } else if args.submit {
        let receipt = reconciler.submit_batch().await?;
        component_info!(COMPONENT, submitted = receipt.submitted, "Saved lines to the draft");
        if let Some(draft) = receipt.draft {
            print_draft(&draft);
        }
    }
    Ok(())
}

fn print_lines(lines: &[OrderLine]) {
    for line in lines {
        let status = match line.match_status {
            shared::MatchStatus::Exact => "✓",
            shared::MatchStatus::Similar => "~",
            shared::MatchStatus::Unmatched => "!",
        };
        let price = line
            .sale_unit_price
            .map(|p| format!(" @ {p}"))
            .unwrap_or_default();
        let customer = if line.customer.is_empty() { "-" } else { line.customer.as_str() };
        println!(
            "{status} {:>4} {:>8} {:<5} {:<28} {:<20}{price}",
            line.line_index, line.qty, line.unit, line.product, customer
        );
        if !line.is_resolved() {
            for suggestion in line.suggestions.iter().take(3) {
                println!("         ↳ {} {} ({:.0}%)", suggestion.id, suggestion.name, suggestion.score * 100.0);
            }
        }
    }
}

fn print_draft(draft: &DraftDetail) {
    println!("📋 Draft ({} items)", draft.items.len());
    for item in &draft.items {
        let qty = item.qty.map(|q| q.to_string()).unwrap_or_default();
        let unit = item.unit.map(|u| u.to_string()).unwrap_or_default();
        println!(
            "  {:<20} {:<28} {:>8} {}",
            item.customer_name.as_deref().unwrap_or("Customer"),
            item.display_product(),
            qty,
            unit
        );
        if let Some(notes) = &item.notes {
            println!("      💬 {notes}");
        }
    }
}
