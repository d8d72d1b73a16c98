//! Clap derive structures for the `phonedeck` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.
//! Also compiled by `build.rs` for man page generation, so it must only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// phonedeck -- keep a phone catalog and wishlist in a json-server store
#[derive(Debug, Parser)]
#[command(
    name = "phonedeck",
    version,
    about = "Manage a phone catalog, wishlist and reviews from the command line",
    long_about = "Client for a phone catalog kept in a json-server record store.\n\n\
        Devices live in the `mobiles` collection, wishlist entries in `wishlist`\n\
        and user reviews in `reviews`. Every change is written to the store and\n\
        the affected collections are reloaded from it afterwards.",
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
pub struct GlobalOpts {
    /// Store profile to use
    #[arg(long, short = 'p', env = "PHONEDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Record store base URL (overrides profile)
    #[arg(long, short = 'S', env = "PHONEDECK_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PHONEDECK_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PHONEDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// Plain text, one id per line (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and edit the device catalog
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage the wishlist
    #[command(alias = "wl", alias = "w")]
    Wishlist(WishlistArgs),

    /// Read and write device reviews
    #[command(alias = "rv")]
    Reviews(ReviewsArgs),

    /// Check that the record store is reachable
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices, optionally filtered
    #[command(alias = "ls")]
    List(DeviceListArgs),

    /// Show one device in detail
    #[command(alias = "get")]
    Show {
        /// Device ID
        device: String,
    },

    /// Add a device to the catalog
    Add(DeviceFieldArgs),

    /// Edit an existing device; unset flags keep their current value
    #[command(alias = "edit")]
    Update {
        /// Device ID
        device: String,

        #[command(flatten)]
        fields: DeviceFieldArgs,
    },

    /// Delete a device and any wishlist entries pointing at it
    #[command(alias = "rm")]
    Remove {
        /// Device ID
        device: String,
    },
}

#[derive(Debug, Args)]
pub struct DeviceListArgs {
    /// Case-insensitive substring over name, brand, model, specs and description
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only devices of this brand (case-insensitive, exact)
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Only devices rated at least this many stars
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_rating: Option<u8>,
}

/// Editable device fields shared by `add` and `update`.
#[derive(Debug, Default, Args)]
pub struct DeviceFieldArgs {
    /// Read the fields from a JSON file first; flags override it
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Device name (required on add)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Brand (required on add)
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Storage, e.g. "128GB"
    #[arg(long)]
    pub storage: Option<String>,

    /// RAM, e.g. "8GB"
    #[arg(long)]
    pub ram: Option<String>,

    /// Screen size, e.g. "6.2\""
    #[arg(long)]
    pub screen_size: Option<String>,

    /// Camera, e.g. "50MP"
    #[arg(long)]
    pub camera: Option<String>,

    /// Battery, e.g. "4700mAh"
    #[arg(long)]
    pub battery: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Price in rupees
    #[arg(long)]
    pub price: Option<f64>,

    /// Star rating (1-5)
    #[arg(long)]
    pub rating: Option<u8>,

    /// Image URL or data: URL
    #[arg(long)]
    pub image: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WISHLIST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// List wishlist entries
    #[command(alias = "ls")]
    List,

    /// Add a device to the wishlist, or remove it if already there
    Toggle {
        /// Device ID
        device: String,
    },

    /// Remove one wishlist entry
    #[command(alias = "rm")]
    Remove {
        /// Wishlist entry ID
        entry: String,
    },

    /// Remove every wishlist entry
    Clear,

    /// Remove entries whose device no longer exists
    Repair,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REVIEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReviewsCommand {
    /// List reviews for a device
    #[command(alias = "ls")]
    List {
        /// Device ID
        device: String,
    },

    /// Review a device
    Add {
        /// Device ID
        device: String,

        #[command(flatten)]
        review: ReviewFieldArgs,
    },

    /// Rewrite an existing review
    Update {
        /// Device ID the review belongs to
        device: String,

        /// Review ID
        review: String,

        #[command(flatten)]
        fields: ReviewFieldArgs,
    },

    /// Delete a review
    #[command(alias = "rm")]
    Remove {
        /// Review ID
        review: String,
    },
}

#[derive(Debug, Args)]
pub struct ReviewFieldArgs {
    /// Star rating (1-5)
    #[arg(long, short = 'r')]
    pub rating: u8,

    /// Review text
    #[arg(long, short = 'm')]
    pub comment: String,

    /// Name shown next to the review
    #[arg(long, default_value = "")]
    pub reviewer: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with a single profile
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
