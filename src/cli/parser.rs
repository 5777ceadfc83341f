use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for rattendance
/// Badge-scan attendance logger with background sync
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Badge-scan attendance logger: durable local log in SQLite, background sync to a remote store",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable diagnostic output
    #[arg(global = true, short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or validate the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Validate the remote store settings")]
        check: bool,
    },

    /// Manage the database (integrity checks, info, vacuum)
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record a single badge scan (direction is chosen automatically)
    Scan {
        /// Badge id as read from the reader
        badge: String,
    },

    /// Daily attendance summary (first in, last out, current status)
    Summary {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Day to summarize (default: today)")]
        date: Option<String>,
    },

    /// List raw scan records
    List {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Day to list (default: today)")]
        date: Option<String>,

        #[arg(long = "unsynced", help = "List every record not yet delivered to the remote store")]
        unsynced: bool,
    },

    /// Run one sync cycle against the remote store
    Sync {
        #[arg(long = "status", help = "Only show pending records and remote settings")]
        status_only: bool,
    },

    /// Interactive scan station: reads badge ids from stdin and syncs in the background
    Kiosk {
        #[arg(long = "interval", value_name = "SECS", help = "Sync interval override in seconds")]
        interval: Option<u64>,
    },
}
