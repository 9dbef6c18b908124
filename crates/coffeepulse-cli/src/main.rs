use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod devices;

#[derive(Parser)]
#[command(name = "coffeepulse", version, about = "Coffee Pulse pour-over brewing assistant")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a brew in the terminal
    Brew(commands::brew::BrewArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show the brew phases and their cues
    Phases {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Water targets for a dose and ratio
    Calc(commands::calc::CalcArgs),
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Brew(args) => commands::brew::run(args).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Phases { json } => commands::phases::run(json),
        Commands::Calc(args) => commands::calc::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "coffeepulse",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
