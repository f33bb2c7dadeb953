use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.4.2" for releases, "0.4.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    // Use a static to compute the version string once
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "platen", bin_name = "platen", version = get_version())]
#[command(about = "A local-first blog engine with an in-place overlay editor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Site directory (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub site: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a site seeded with starter content
    Init,

    /// List content
    #[command(alias = "ls")]
    List {
        /// Restrict to one content type (post, page, or setting)
        kind: Option<String>,
    },

    /// Show the item an address resolves to
    #[command(alias = "s")]
    Show {
        /// Address fragment, e.g. "blog/hello-platen" (omit for the landing page)
        address: Option<String>,
    },

    /// Create a new post
    #[command(alias = "n")]
    New {
        /// Title of the post (optional, opens editor if not provided)
        #[arg(required = false)]
        title: Option<String>,

        /// Content of the post
        #[arg(required = false)]
        content: Option<String>,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,
    },

    /// Edit an item in the editor
    #[command(alias = "e")]
    Edit {
        /// Address fragment or slug of the item
        target: String,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Slug of the post
        slug: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., file-ext, landing-slug)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Browse and edit the site interactively
    #[command(alias = "a")]
    Admin,
}
