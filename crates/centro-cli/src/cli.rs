//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::time::Duration;

use centro_client::config::{DEFAULT_BASE_URL, ENV_SESSION_FILE, ENV_TIMEOUT_SECS, ENV_URL};
use centro_client::{ClientConfig, JobStatusFilter};
use clap::{Parser, Subcommand, ValueEnum};

use crate::error::CliError;

/// Centro admin CLI - inspect and manage jobs, instances and nodes.
#[derive(Parser, Debug, Clone)]
#[command(name = "centroctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend URL.
    #[arg(short, long, env = ENV_URL, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Session file (defaults to <config dir>/centro/auth.json).
    #[arg(long, env = ENV_SESSION_FILE)]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = 30)]
    pub timeout: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Client configuration described by the global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or timeout is invalid.
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let mut config =
            ClientConfig::new(&self.url).with_timeout(Duration::from_secs(self.timeout));
        if let Some(path) = &self.session_file {
            config = config.with_session_path(path);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,

        /// Account password.
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Show the stored session.
    Whoami,

    /// Job commands.
    Jobs {
        /// Job subcommand to execute.
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Instance commands.
    Instances {
        /// Instance subcommand to execute.
        #[command(subcommand)]
        command: InstanceCommands,
    },

    /// Node commands.
    Nodes {
        /// Node subcommand to execute.
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Show cluster-wide counters.
    Stats,
}

/// Job subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum JobCommands {
    /// List jobs.
    List {
        /// Only jobs in this state (queued, active, completed, failed).
        #[arg(short, long)]
        status: Option<JobStatusFilter>,
    },

    /// Show one job.
    Get {
        /// Job ID.
        id: String,
    },

    /// Show the status of one job.
    Status {
        /// Job ID.
        id: String,
    },

    /// Show the event log of one job.
    Events {
        /// Job ID.
        id: String,
    },

    /// Submit a job described by a JSON file.
    Submit {
        /// Path to the submission payload.
        file: PathBuf,
    },
}

/// Instance subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InstanceCommands {
    /// List instances.
    List,

    /// Show one instance.
    Get {
        /// Instance ID.
        id: String,
    },
}

/// Node subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NodeCommands {
    /// List nodes.
    List,

    /// Show one node.
    Get {
        /// Node ID.
        id: String,
    },

    /// Show the health report of one node.
    Health {
        /// Node ID.
        id: String,
    },
}
