use crate::client::{DEFAULT_PAGE_LIMIT, IssueSort, SortOrder};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bugsink")]
#[command(
    author,
    version,
    about = "BugSink CLI - API wrapper for BugSink error tracking",
    after_help = "Environment Variables:
  BUGSINK_API_KEY      API authentication token (required)
  BUGSINK_HOST         API host (default: https://bugs.kopernici.cz)
  BUGSINK_PROJECT_ID   Default project ID (takes precedence over .bugsink file)

Configuration File:
  .bugsink             Project ID for current directory (ignored if BUGSINK_PROJECT_ID is set)"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub json: bool,

    /// Minimal output (IDs only)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Debug logging and full error chains
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write JSON logs to this file (rotated daily)
    #[arg(long, global = true, env = "BUGSINK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.quiet {
            OutputFormat::Quiet
        } else {
            OutputFormat::Table
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Quiet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigAction),

    /// Team operations
    #[command(subcommand)]
    Teams(TeamsAction),

    /// Project operations
    #[command(subcommand)]
    Projects(ProjectsAction),

    /// Issue operations (read-only)
    #[command(subcommand)]
    Issues(IssuesAction),

    /// Event operations (read-only)
    #[command(subcommand)]
    Events(EventsAction),

    /// Release operations
    #[command(subcommand)]
    Releases(ReleasesAction),
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set default project ID in the .bugsink file
    SetProject {
        /// Project ID
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        id: u64,
    },

    /// Test API connectivity
    Test,
}

#[derive(Subcommand)]
pub enum TeamsAction {
    /// List all teams
    #[command(visible_alias = "ls")]
    List,

    /// Get team details
    Get {
        /// Team UUID
        uuid: String,
    },

    /// Create a team from JSON, e.g. '{"name":"My Team","visibility":"hidden"}'
    Create {
        /// Team fields as JSON (name required; visibility: joinable, discoverable, hidden)
        #[arg(value_name = "JSON")]
        data: String,
    },

    /// Update a team from JSON, e.g. '{"name":"New Name"}'
    Update {
        /// Team UUID
        uuid: String,

        /// Fields to change as JSON
        #[arg(value_name = "JSON")]
        data: String,
    },
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects (optionally filtered by team)
    #[command(visible_alias = "ls")]
    List {
        /// Filter by team UUID
        #[arg(long)]
        team: Option<String>,
    },

    /// Get project details
    Get {
        /// Project ID
        id: u64,
    },

    /// Create a project from JSON, e.g. '{"team":"<uuid>","name":"Web"}'
    Create {
        /// Project fields as JSON (team and name required; visibility, alert_on_new_issue,
        /// alert_on_regression, alert_on_unmute optional)
        #[arg(value_name = "JSON")]
        data: String,
    },

    /// Update a project from JSON, e.g. '{"alert_on_new_issue":false}'
    Update {
        /// Project ID
        id: u64,

        /// Fields to change as JSON
        #[arg(value_name = "JSON")]
        data: String,
    },
}

#[derive(Subcommand)]
pub enum IssuesAction {
    /// List issues for a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID (defaults to the configured project)
        #[arg(long)]
        project: Option<u64>,

        /// Sort field
        #[arg(long, value_enum, default_value = "last_seen")]
        sort: IssueSortArg,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get issue details
    Get {
        /// Issue UUID
        uuid: String,
    },
}

#[derive(Subcommand)]
pub enum EventsAction {
    /// List events for an issue
    #[command(visible_alias = "ls")]
    List {
        /// Issue UUID
        #[arg(long)]
        issue: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get event details
    Get {
        /// Event UUID
        uuid: String,
    },

    /// Print the formatted stacktrace of an event
    Stacktrace {
        /// Event UUID
        uuid: String,
    },
}

#[derive(Subcommand)]
pub enum ReleasesAction {
    /// List releases for a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID (defaults to the configured project)
        #[arg(long)]
        project: Option<u64>,
    },

    /// Get release details
    Get {
        /// Release UUID
        uuid: String,
    },

    /// Create a release from JSON, e.g. '{"project":8,"version":"v1.2.3"}'
    Create {
        /// Release fields as JSON (project and version required; timestamp optional)
        #[arg(value_name = "JSON")]
        data: String,
    },
}

/// Paging options shared by issue and event listings.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Sort order
    #[arg(long, value_enum, default_value = "desc")]
    pub order: OrderArg,

    /// Page size
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Continue from a cursor returned by a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Fetch every page
    #[arg(long, conflicts_with = "cursor")]
    pub all: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum IssueSortArg {
    LastSeen,
    DigestOrder,
}

impl From<IssueSortArg> for IssueSort {
    fn from(arg: IssueSortArg) -> Self {
        match arg {
            IssueSortArg::LastSeen => IssueSort::LastSeen,
            IssueSortArg::DigestOrder => IssueSort::DigestOrder,
        }
    }
}
