//! Runtime configuration, read from environment variables.
//!
//! `main` loads `.env` (if present) before calling [`Config::from_env`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DONATIONS_FILE: &str = "donations.csv";

const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub donations_file: PathBuf,
    pub production: bool,
    pub allowed_origins: Vec<String>,
    /// Requests replenished per second for each client IP.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let production = get("RUST_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let host = match get("HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| Error::config(format!("HOST is not an IP address: {}", raw)))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::config(format!("PORT is not a valid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let donations_file = get("DONATIONS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DONATIONS_FILE));

        let mut allowed_origins: Vec<String> = get("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if allowed_origins.is_empty() {
            if production {
                return Err(Error::config(
                    "ALLOWED_ORIGINS must contain at least one origin in production",
                ));
            }
            allowed_origins = DEV_ORIGINS.iter().map(|s| s.to_string()).collect();
        }

        let rate_limit_per_second = get("RATE_LIMIT_PER_SECOND")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(20);
        let rate_limit_burst = get("RATE_LIMIT_BURST")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(100);

        Ok(Config {
            host,
            port,
            donations_file,
            production,
            allowed_origins,
            rate_limit_per_second,
            rate_limit_burst,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Milliseconds between replenished rate-limit tokens.
    pub fn rate_limit_period_ms(&self) -> u64 {
        (1000 / self.rate_limit_per_second).max(1)
    }
}
