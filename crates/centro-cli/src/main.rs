//! Centro CLI binary entrypoint.
//!
//! This is the main entry point for the `centroctl` command-line tool.

use std::io;
use std::process::ExitCode;

use centro_client::PanelClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use centro_cli::cli::{Cli, Commands};
use centro_cli::commands::{AuthCommand, InstanceCommand, JobCommand, NodeCommand, StatsCommand};
use centro_cli::output::OutputFormat;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_unauthorized() {
                eprintln!("Session cleared; run `centroctl login` again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), centro_cli::CliError> {
    let config = cli.client_config()?;
    let client = PanelClient::from_config(&config)?;
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Login { username, password } => {
            let cmd = AuthCommand::new(&client);
            cmd.login(&mut stdout, &format, username, password).await?;
        }
        Commands::Logout => {
            AuthCommand::new(&client).logout(&mut stdout, &format)?;
        }
        Commands::Whoami => {
            AuthCommand::new(&client).whoami(&mut stdout, &format)?;
        }
        Commands::Jobs { command } => {
            let cmd = JobCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Instances { command } => {
            let cmd = InstanceCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Nodes { command } => {
            let cmd = NodeCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Stats => {
            StatsCommand::new(&client).execute(&mut stdout, &format).await?;
        }
    }

    Ok(())
}
