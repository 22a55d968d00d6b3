use power_toggle::api::{self, ApiClient};
use power_toggle::config::{self, DEFAULT_API_BASE_URL};
use power_toggle::models::{AppState, Environment, EnvironmentState, InstanceState};
use power_toggle::routes::build_router;
use power_toggle::store::{actions, ActionOutcome, PowerAction, Store};
use power_toggle::utils::object_rows;

use std::net::SocketAddr;
use std::process;
use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use comfy_table::{Table, presets, modifiers, ContentArrangement};
use terminal_size::{Width, terminal_size};

fn build_client(api_url: Option<&str>, env_file: Option<&str>) -> ApiClient {
    config::load_env_file(env_file);
    let base_url = match api_url {
        Some(u) => config::sanitize_base_url(u),
        None => config::get_api_base_url(),
    };
    match ApiClient::new(base_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(%e, "Failed to create HTTP client");
            eprintln!("{}: {}", yansi::Paint::new("Failed to create HTTP client").red(), e);
            process::exit(1);
        }
    }
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::new("Failed to read custom stylesheet at").red(), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::new("Invalid host/port format").red(), e);
            process::exit(1);
        }
    };
    let backend = state.api.base_url().to_string();
    let app = build_router(state);
    tracing::info!(%addr, %backend, "Starting power-toggle dashboard");
    println!(
        "{} {} {} {}",
        yansi::Paint::new("Dashboard running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan(),
        yansi::Paint::new("backend").dim(),
        yansi::Paint::new(&backend).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!("{}: {}\n{}", yansi::Paint::new(format!("Failed to bind to {}", addr)).red(), e, yansi::Paint::new("Please stop any process using this port, or start the dashboard with a different --port value.").yellow());
            process::exit(1);
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn paint_env_state(state: &EnvironmentState) -> String {
    let label = state.as_str();
    match state {
        EnvironmentState::Running => yansi::Paint::new(label).green().to_string(),
        EnvironmentState::Stopped => yansi::Paint::new(label).red().to_string(),
        EnvironmentState::Mixed => yansi::Paint::new(label).yellow().to_string(),
        _ => yansi::Paint::new(label).blue().to_string(),
    }
}

fn paint_instance_state(state: &InstanceState) -> String {
    let label = state.as_str();
    match state {
        InstanceState::Running => yansi::Paint::new(label).green().to_string(),
        InstanceState::Stopped => yansi::Paint::new(label).red().to_string(),
        _ => yansi::Paint::new(label).blue().to_string(),
    }
}

fn print_environments<'a>(envs: impl IntoIterator<Item = &'a Environment>) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Region", "State", "Running", "vCPU", "Memory (GB)"]);
    let mut rows = 0;
    for env in envs {
        table.add_row(vec![
            env.id.clone(),
            env.name.clone(),
            env.region.clone(),
            paint_env_state(&env.state),
            format!("{}/{}", env.running_instances, env.total_instances),
            env.total_vcpu.to_string(),
            env.total_memory_gb.to_string(),
        ]);
        rows += 1;
    }
    if rows == 0 {
        println!("(no environments)");
        return;
    }
    println!("\n{table}\n");
}

fn print_instances(env: &Environment) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Type", "vCPU", "Memory (GB)", "State"]);
    for inst in &env.instances {
        table.add_row(vec![
            inst.id.clone(),
            inst.name.clone(),
            inst.instance_type.clone(),
            inst.vcpu.to_string(),
            inst.memory_gb.to_string(),
            paint_instance_state(&inst.state),
        ]);
    }
    println!("\n{table}\n");
}

fn print_key_values(rows: Vec<(String, String)>) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (k, v) in rows {
        table.add_row(vec![k, v]);
    }
    println!("\n{table}\n");
}

/// Print the store's error slot and exit unless the action completed.
fn exit_unless_completed(store: &Store, outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Completed => {}
        ActionOutcome::AlreadyInFlight => {
            eprintln!("{}", yansi::Paint::new("A request for this target is already in flight").yellow());
            process::exit(1);
        }
        ActionOutcome::Failed => {
            let msg = store.read(|s| s.error.clone()).unwrap_or_else(|| api::FALLBACK_ERROR_MESSAGE.to_string());
            eprintln!("{}: {}", yansi::Paint::new("Error").red().bold(), msg);
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "power-toggle",
    author,
    version,
    about = "Power Toggle command-line tool",
    long_about = r#"Power Toggle: view your cloud environments and switch them on and off.

The tool talks to an aws-power-toggle backend. It can serve a small web dashboard or run the same actions directly from the terminal. Point it at the backend with `--api-url`, the API_BASE_URL environment variable, or a `.env` file.

Examples:
  1) Run the dashboard:
      power-toggle serve --port 8081
  2) Inspect environments:
      power-toggle env list
      power-toggle env show <env-id>
  3) Toggle things:
      power-toggle env stop <env-id>
      power-toggle instance start <instance-id> <instance-id>
"#,
    after_help = "Use `power-toggle <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to (defaults to HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (defaults to PORT or 8081)
        #[arg(long)]
        port: Option<u16>,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and backend connectivity
    #[command(about = "Validate configuration and ensure the backend answers.", long_about = "Check that a backend URL is configured and that the backend answers GET /version.")]
    CheckConfig { env_file: Option<String> },
    /// Inspect and toggle environments
    #[command(about = "List, inspect, start and stop environments")]
    Env {
        #[command(subcommand)]
        sub: EnvCommands,
    },
    /// Toggle individual instances
    #[command(about = "Start and stop individual instances", long_about = "Start or stop one or more instances. Several ids are toggled concurrently; the owning environments are printed afterwards.")]
    Instance {
        #[command(subcommand)]
        sub: InstanceCommands,
    },
    /// Show the backend version
    Version,
    /// Show the backend configuration
    Config,
    /// Ask the backend to re-poll its provider, then list environments
    Refresh,
}

#[derive(Subcommand)]
enum EnvCommands {
    #[command(about = "List environments", long_about = "List environments with their aggregate state. Use --details to fetch instance lists as well (slower on large accounts).")]
    List {
        #[arg(long, default_value_t = false)]
        details: bool,
    },
    #[command(about = "Show one environment and its instances")]
    Show { env_id: String },
    #[command(about = "Start every instance of an environment")]
    Start { env_id: String },
    #[command(about = "Stop every instance of an environment")]
    Stop { env_id: String },
}

#[derive(Subcommand)]
enum InstanceCommands {
    #[command(about = "Start one or more instances")]
    Start {
        #[arg(required = true)]
        instance_ids: Vec<String>,
    },
    #[command(about = "Stop one or more instances")]
    Stop {
        #[arg(required = true)]
        instance_ids: Vec<String>,
    },
}

async fn run_env_toggle(store: &Store, client: &ApiClient, env_id: &str, action: PowerAction) {
    let outcome = actions::fetch_all_environments_summary(store, client).await;
    exit_unless_completed(store, outcome);
    if store.read(|s| s.environment(env_id).is_none()) {
        eprintln!("{} '{}' {}", yansi::Paint::new("Environment").red(), env_id, yansi::Paint::new("not found").red());
        process::exit(1);
    }
    let outcome = actions::toggle_environment(store, client, env_id, action).await;
    exit_unless_completed(store, outcome);
    let snapshot = store.snapshot();
    if let Some(env) = snapshot.environment(env_id) {
        println!("{} {} {}", yansi::Paint::new("Requested").green(), action, yansi::Paint::new(&env.name).cyan());
        print_environments([&**env]);
    }
}

async fn run_instance_toggle(store: &Store, client: &ApiClient, instance_ids: &[String], action: PowerAction) {
    let outcome = actions::fetch_all_environments_details(store, client).await;
    exit_unless_completed(store, outcome);

    let mut targets = Vec::new();
    let mut missing = false;
    for id in instance_ids {
        match store.read(|s| s.environment_for_instance(id).map(|e| e.id.clone())) {
            Some(env_id) => targets.push((env_id, id.clone())),
            None => {
                eprintln!("{} '{}' {}", yansi::Paint::new("Instance").red(), id, yansi::Paint::new("not found in any environment").red());
                missing = true;
            }
        }
    }

    let outcomes = join_all(
        targets
            .iter()
            .map(|(env_id, id)| actions::toggle_instance(store, client, env_id, id, action)),
    )
    .await;

    let snapshot = store.snapshot();
    let mut touched: Vec<&str> = targets.iter().map(|(env_id, _)| env_id.as_str()).collect();
    touched.sort_unstable();
    touched.dedup();
    for env_id in touched {
        if let Some(env) = snapshot.environment(env_id) {
            println!("{}", yansi::Paint::new(&env.name).bold());
            print_instances(env);
        }
    }

    if let Some(failed) = outcomes.into_iter().find(|o| !o.is_completed()) {
        exit_unless_completed(store, failed);
    }
    if missing {
        process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        api::set_silent(true);
    }

    let api_url = cli.api_url.as_deref();

    // Dispatch CLI commands. If no command provided, serve the dashboard by default
    let Some(command) = cli.command else {
        let client = build_client(api_url, None);
        start_server(AppState::new(client), &config::get_host(), config::get_port(), None).await;
        return;
    };

    match command {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let client = build_client(api_url, env_file.as_deref());
            let host = host.unwrap_or_else(config::get_host);
            let port = port.unwrap_or_else(config::get_port);
            start_server(AppState::new(client), &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let client = build_client(api_url, env_file.as_deref());
            if std::env::var("API_BASE_URL").is_err() && api_url.is_none() {
                println!("{} {}", yansi::Paint::new("API_BASE_URL is not set; using default").yellow(), DEFAULT_API_BASE_URL);
            }
            match client.get_version().await {
                Ok(info) => {
                    println!(
                        "{} {} (version {})",
                        yansi::Paint::new("Backend reachable at").green(),
                        client.base_url(),
                        info.version
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Env { sub } => {
            let client = build_client(api_url, None);
            let store = Store::new();
            match sub {
                EnvCommands::List { details } => {
                    let outcome = if details {
                        actions::fetch_all_environments_details(&store, &client).await
                    } else {
                        actions::fetch_all_environments_summary(&store, &client).await
                    };
                    exit_unless_completed(&store, outcome);
                    let snapshot = store.snapshot();
                    print_environments(snapshot.environments.iter().map(|e| &**e));
                    if let (Some(accrued), Some(saved)) = (&snapshot.total_bills_accrued, &snapshot.total_bills_saved) {
                        println!("{}", yansi::Paint::new(format!("Bills accrued: ${} | saved: ${}", accrued, saved)).dim());
                    }
                }
                EnvCommands::Show { env_id } => {
                    let outcome = actions::fetch_all_environments_summary(&store, &client).await;
                    exit_unless_completed(&store, outcome);
                    let outcome = actions::fetch_environment_details(&store, &client, &env_id).await;
                    exit_unless_completed(&store, outcome);
                    let snapshot = store.snapshot();
                    match snapshot.environment(&env_id) {
                        Some(env) => {
                            print_environments([&**env]);
                            print_instances(env);
                        }
                        None => {
                            eprintln!("{} '{}' {}", yansi::Paint::new("Environment").red(), env_id, yansi::Paint::new("not found").red());
                            process::exit(1);
                        }
                    }
                }
                EnvCommands::Start { env_id } => {
                    run_env_toggle(&store, &client, &env_id, PowerAction::Start).await;
                }
                EnvCommands::Stop { env_id } => {
                    run_env_toggle(&store, &client, &env_id, PowerAction::Stop).await;
                }
            }
        }
        Commands::Instance { sub } => {
            let client = build_client(api_url, None);
            let store = Store::new();
            match sub {
                InstanceCommands::Start { instance_ids } => {
                    run_instance_toggle(&store, &client, &instance_ids, PowerAction::Start).await;
                }
                InstanceCommands::Stop { instance_ids } => {
                    run_instance_toggle(&store, &client, &instance_ids, PowerAction::Stop).await;
                }
            }
        }
        Commands::Version => {
            let client = build_client(api_url, None);
            match client.get_version().await {
                Ok(info) => print_key_values(vec![
                    ("client".into(), env!("CARGO_PKG_VERSION").into()),
                    ("backend".into(), info.version),
                    ("git_hash".into(), info.git_hash),
                    ("build_date".into(), info.build_date),
                ]),
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Error").red().bold(), e.user_message());
                    process::exit(1);
                }
            }
        }
        Commands::Config => {
            let client = build_client(api_url, None);
            let store = Store::new();
            let outcome = actions::fetch_config(&store, &client).await;
            exit_unless_completed(&store, outcome);
            if let Some(config) = store.read(|s| s.config.clone()) {
                print_key_values(object_rows(&config));
            }
        }
        Commands::Refresh => {
            let client = build_client(api_url, None);
            let store = Store::new();
            let outcome = actions::refresh(&store, &client).await;
            exit_unless_completed(&store, outcome);
            let snapshot = store.snapshot();
            print_environments(snapshot.environments.iter().map(|e| &**e));
        }
    }
}
