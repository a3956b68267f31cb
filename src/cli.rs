// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global flags (--api-url, --token, --json) apply to every subcommand and
// override the matching environment variables (see config.rs).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use crate::http::HttpMethod;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "squares",
    version,
    about = "Your source-control stats, in the terminal",
    long_about = "squares reads commit, language and repository statistics from the Squares \
                  dashboard API and renders them as terminal panels. Every panel is fetched \
                  independently, so one failing endpoint never hides the others."
)]
pub struct Cli {
    /// Base URL of the dashboard API (overrides SQUARES_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token sent with every request (overrides SQUARES_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print raw fetch states as JSON instead of panels
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Your commits, languages and recent repositories
    ///
    /// Example: squares user
    User,

    /// Your repositories, with languages, statistics, contributors and pull requests
    ///
    /// Example: squares repositories --json
    Repositories,

    /// Just the sidebar: navigation and the signed-in account
    Account,

    /// Issue a single request through a fetch controller and print its final state
    ///
    /// Example: squares fetch /api/settings --method POST --body '{"theme":"dark"}'
    Fetch {
        /// Endpoint path (e.g. /api/users) or full URL
        endpoint: String,

        /// HTTP method, fixed for the controller
        #[arg(long, value_enum, ignore_case = true, default_value_t = HttpMethod::Get)]
        method: HttpMethod,

        /// JSON request body (ignored for GET)
        #[arg(long)]
        body: Option<String>,
    },
}
