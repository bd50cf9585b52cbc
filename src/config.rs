//! Runtime configuration from flags, environment and `.env`

use crate::auth::jwt::{DEFAULT_TTL_HOURS, MAX_TTL_HOURS};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "storefront")]
#[command(about = "Storefront backend - users, catalog and orders over HTTP")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, env = "DATABASE_PATH", default_value = "storefront.db")]
    pub database_path: String,

    /// HMAC secret used to sign session tokens
    #[arg(
        long,
        env = "JWT_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub jwt_secret: String,

    /// Session token lifetime in hours
    #[arg(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value_t = DEFAULT_TTL_HOURS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TTL_HOURS)
    )]
    pub token_ttl_hours: i64,

    /// bcrypt work factor
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Login of an admin account to create at startup
    #[arg(long, env = "ADMIN_LOGIN", requires = "admin_password")]
    pub admin_login: Option<String>,

    /// Password for the bootstrap admin
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Bootstrap admin credentials, when both halves are configured
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_login, &self.admin_password) {
            (Some(login), Some(password)) => Some((login, password)),
            _ => None,
        }
    }
}

/// Load `.env` from the working directory (and parents), then the crate root
pub fn load_env() {
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
