use clap::{Parser, Subcommand};
use paper_finder::{
    config::Config, create_router, display, utils, AppError, AppState, CondenseMode, PaperService,
};
use std::io::Read;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "paper-finder", version, about = "Find research papers and summarize text")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search journal articles by keyword
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Number of papers to retrieve
        #[arg(short, long)]
        limit: Option<u32>,
        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Summarize text (reads stdin when TEXT is omitted)
    Summarize { text: Option<String> },
    /// Run text through the generation model (reads stdin when TEXT is omitted)
    Generate { text: Option<String> },
    /// Serve the HTTP API
    Serve,
    /// Interactive terminal UI (default)
    Tui,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    // The TUI owns the terminal, so its logs go to a file
    let _guard = match command {
        Command::Tui => match utils::init_file_logger() {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("File logging disabled: {}", e);
                None
            }
        },
        _ => {
            utils::init_logger();
            None
        }
    };

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let service = Arc::new(PaperService::from_config(&config));

    match command {
        Command::Search { keywords, limit, json } => {
            let limit = match config.search.check_limit(limit) {
                Ok(limit) => limit,
                Err(e) => return Ok(report("Search failed", &e)),
            };

            match service.search(&keywords.join(" "), limit).await {
                Ok(rows) if json => println!("{}", serde_json::to_string_pretty(&rows)?),
                Ok(rows) => print!("{}", display::render_table(&rows)),
                Err(e) => return Ok(report("Search failed", &e)),
            }
        }
        Command::Summarize { text } => {
            return condense(&service, text, CondenseMode::Summarize).await;
        }
        Command::Generate { text } => {
            return condense(&service, text, CondenseMode::Generate).await;
        }
        Command::Serve => serve(config, service).await?,
        Command::Tui => paper_finder::tui::run(config, service).await?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn condense(service: &PaperService, text: Option<String>, mode: CondenseMode) -> anyhow::Result<ExitCode> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    match service.condense(&text, mode).await {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let label = match mode {
                CondenseMode::Summarize => "Summarization failed",
                CondenseMode::Generate => "Generation failed",
            };
            Ok(report(label, &e))
        }
    }
}

fn report(label: &str, err: &AppError) -> ExitCode {
    match err {
        AppError::InvalidRequest(message) => eprintln!("{}", message),
        _ => eprintln!("{}: {}", label, err.cause()),
    }
    ExitCode::FAILURE
}

async fn serve(config: Config, service: Arc<PaperService>) -> anyhow::Result<()> {
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST {:?}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));

    let state = AppState { config, service };
    let app = create_router(state);

    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
