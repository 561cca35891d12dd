//! Configuration loading from command-line flags and environment.
//!
//! Every flag except `--version` can also be set through an environment
//! variable. Flags win over the environment.

use clap::Parser;

use crate::config::schema::{parse_listen_address, Config, DEFAULT_ALLOWED_ORIGINS};
use crate::observability::LogLevel;

/// Command-line interface of the service.
#[derive(Debug, Clone, Parser)]
#[command(name = env!("CARGO_PKG_NAME"), about, disable_version_flag = true)]
pub struct Cli {
    /// Print version and exit.
    #[arg(long)]
    pub version: bool,

    /// Log verbosity.
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Network address and port the server listens on.
    #[arg(
        long,
        env = "SERVER_LISTEN_ADDRESS",
        default_value = ":1080",
        value_parser = parse_listen_address
    )]
    pub listen_address: std::net::SocketAddr,

    /// CORS allowed origins, comma separated.
    #[arg(long, env = "SERVER_CORS_ALLOWED_ORIGINS", default_value = DEFAULT_ALLOWED_ORIGINS)]
    pub cors_allowed_origins: String,

    /// URL for connecting to Postgres.
    #[arg(long, env = "POSTGRES_URL", default_value = "", hide_env_values = true)]
    pub postgres_url: String,
}

impl Cli {
    /// Service configuration carried by the flags.
    pub fn into_config(self) -> Config {
        Config {
            listen_address: self.listen_address,
            allowed_origins: self.cors_allowed_origins,
            postgres_url: self.postgres_url,
        }
    }
}

/// One-line version string: `<name> <version> (<commit>-<branch>)`.
///
/// Commit and branch come from `GIT_COMMIT` and `GIT_BRANCH` at build time.
pub fn version_line() -> String {
    format!(
        "{} {} ({}-{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_COMMIT").unwrap_or("unknown"),
        option_env!("GIT_BRANCH").unwrap_or("unknown"),
    )
}
