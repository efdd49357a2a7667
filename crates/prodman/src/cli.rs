//! Clap derive structures for the `prodman` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it may only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// prodman -- manage a product catalog and its documents
#[derive(Debug, Parser)]
#[command(
    name = "prodman",
    version,
    about = "Manage a product catalog and its documents from the command line",
    long_about = "Browse, create, edit and delete catalog products, and attach \
        documents to them as uploaded files or external URLs.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PRODMAN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend API URL (overrides profile)
    #[arg(long, env = "PRODMAN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PRODMAN_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PRODMAN_INSECURE", global = true)]
    pub insecure: bool,
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

/// Document kinds accepted by the backend.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocTypeArg {
    Image,
    Pdf,
    Excel,
    Other,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage catalog products
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Manage documents attached to products
    #[command(alias = "docs")]
    Documents(DocumentsArgs),

    /// Check that the backend answers
    Ping,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered by a server-side search
    #[command(alias = "ls")]
    List {
        /// Search term passed to the backend unchanged
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one product with its documents
    Get {
        /// Product ID
        id: String,
    },

    /// Create a product
    Create {
        /// Product name (max 100 characters)
        #[arg(long)]
        name: String,

        /// Product reference (max 50 characters)
        #[arg(long = "ref", value_name = "REF")]
        reference: String,

        /// Free-text description (max 500 characters)
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a product; unspecified fields keep their current values
    Update {
        /// Product ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "ref", value_name = "REF")]
        reference: Option<String>,

        /// New description (pass an empty string to clear it)
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a product and its documents
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: String,
    },

    /// Bulk-import products from a spreadsheet (.xlsx or .csv)
    Import {
        /// Spreadsheet to upload
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOCUMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    pub command: DocumentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocumentsCommand {
    /// List the documents of a product
    #[command(alias = "ls")]
    List {
        /// Product ID
        product_id: String,
    },

    /// Upload a file as a new document
    Upload {
        /// Product ID
        product_id: String,

        /// File to upload
        file: PathBuf,

        /// Document type
        #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "image")]
        doc_type: DocTypeArg,

        /// Display label (defaults to the file name)
        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// Attach an external URL as a new document
    AddUrl {
        /// Product ID
        product_id: String,

        /// http(s) URL of the document
        url: String,

        /// Document type
        #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "image")]
        doc_type: DocTypeArg,

        /// Display label (defaults to the URL)
        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        /// Document ID
        doc_id: String,

        /// Owning product ID (looked up from the document when omitted)
        #[arg(long)]
        product: Option<String>,
    },
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
    /// Display the current configuration
    Show,

    /// Print the config file location
    Path,

    /// Create or update a profile.
    ///
    /// Takes the URL from the global --api-url and the profile name from
    /// --profile (default: "default").
    Init {
        /// Origin for storage-relative document paths
        #[arg(long, value_name = "URL")]
        media_origin: Option<String>,

        /// Path to a PEM CA certificate
        #[arg(long, value_name = "PATH")]
        ca_cert: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
