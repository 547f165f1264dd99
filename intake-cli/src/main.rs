mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::handlers;

#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(version)]
#[command(about = "Account request review service for prospective instructors")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the intake HTTP server
    ///
    /// Settings come from the configuration file; --host and --port override it.
    /// An admin token can be supplied through INTAKE_ADMIN_TOKEN.
    ///
    /// Examples:
    ///   intake serve
    ///   INTAKE_ADMIN_TOKEN=secret intake serve --port 9090
    Serve {
        /// Server bind address
        #[arg(long)]
        host: Option<String>,

        /// Server port number
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<String>,
    },

    /// Configure intake settings interactively
    Config {
        /// Start interactive configuration setup
        #[arg(long)]
        init: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<String>,
    },

    /// Account request commands against a running server
    Request {
        #[command(subcommand)]
        command: cli::request::RequestCommands,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            config_file,
        } => {
            handlers::handle_serve(host, port, config_file).await?;
        }
        Commands::Config { init, config_file } => {
            if init {
                handlers::handle_config_init(config_file).await?;
            } else {
                println!("Config command requires --init flag");
                println!("Usage: intake config --init [--config-file PATH]");
            }
        }
        Commands::Request { command } => {
            cli::request_handlers::handle_request_commands(command).await?;
        }
    }

    Ok(())
}
