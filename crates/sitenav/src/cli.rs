//! Clap derive structures for the `sitenav` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can compile it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitenav -- browse, submit and moderate a website directory
#[derive(Debug, Parser)]
#[command(
    name = "sitenav",
    version,
    about = "Browse, submit and moderate a website directory from the command line",
    long_about = "A command-line client for a curated website directory.\n\n\
        Lists approved sites, submits new ones for review (with optional\n\
        metadata auto-fill), likes and visits entries, and lets admin\n\
        profiles approve or reject the moderation queue.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Directory profile to use
    #[arg(long, short = 'p', env = "SITENAV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Directory server URL (overrides profile)
    #[arg(long, short = 's', env = "SITENAV_SERVER", global = true)]
    pub server: Option<String>,

    /// API bearer token
    #[arg(long, env = "SITENAV_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Act as a moderator (requires a token)
    #[arg(long, global = true)]
    pub admin: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SITENAV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SITENAV_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SITENAV_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Moderation status filter for listings.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    /// Every status (admin only; users always see approved)
    All,
    Pending,
    Approved,
    Rejected,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List directory categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Browse, submit, like and moderate websites
    #[command(alias = "s")]
    Sites(SitesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List websites
    #[command(alias = "ls")]
    List {
        /// Moderation status (non-admin profiles always list approved)
        #[arg(long, value_enum, default_value_t = StatusArg::Approved)]
        status: StatusArg,

        /// Category ID or name
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Search text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one website
    Get {
        /// Website ID
        id: String,
    },

    /// Submit a website for review
    #[command(alias = "add")]
    Submit(SubmitArgs),

    /// Like a website (once per client)
    Like {
        /// Website ID
        id: String,
    },

    /// Record a visit and print the website URL
    Visit {
        /// Website ID
        id: String,
    },

    /// Approve a pending or rejected website (admin)
    Approve {
        /// Website ID
        id: String,
    },

    /// Reject a pending or approved website (admin)
    Reject {
        /// Website ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Website URL
    #[arg(long, short = 'u')]
    pub url: String,

    /// Title (max 100 characters)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description (max 500 characters)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Category ID or name
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Thumbnail image URL
    #[arg(long)]
    pub thumbnail: Option<String>,

    /// Fill title, description and thumbnail from the page metadata
    /// before applying the flags above
    #[arg(long, short = 'a')]
    pub autofill: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
