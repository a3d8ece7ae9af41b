//! Configuration for the to-do server
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

/// Storage backend selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// MongoDB-backed store (default)
    Mongo,
    /// Process-local store, lost on restart
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mongo => "mongo",
            Self::Memory => "memory",
        }
    }
}

/// Todolist - server-rendered to-do lists
#[derive(Parser, Debug, Clone)]
#[command(name = "todolist")]
#[command(about = "Server-rendered to-do lists backed by MongoDB")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://127.0.0.1:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "todolistDB")]
    pub mongodb_db: String,

    /// Storage backend
    #[arg(long, env = "STORE", value_enum, default_value = "mongo")]
    pub store: StoreKind,

    /// Enable development mode (falls back to the memory store if MongoDB is unreachable)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Title of the built-in default list
    #[arg(long, env = "DEFAULT_LIST", default_value = "Today")]
    pub default_list: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            mongodb_uri: "mongodb://127.0.0.1:27017".to_string(),
            mongodb_db: "todolistDB".to_string(),
            store: StoreKind::Memory,
            dev_mode: true,
            log_level: "info".to_string(),
            default_list: "Today".to_string(),
        }
    }
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_list.trim().is_empty() {
            return Err("DEFAULT_LIST must not be empty".to_string());
        }

        if self.default_list.contains('/') {
            return Err("DEFAULT_LIST must not contain '/'".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let args = Args::parse_from(["todolist"]);
        assert_eq!(args.listen.port(), 3000);
        assert_eq!(args.mongodb_db, "todolistDB");
        assert_eq!(args.store, StoreKind::Mongo);
        assert_eq!(args.default_list, "Today");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_memory_store_flag() {
        let args = Args::parse_from(["todolist", "--store", "memory"]);
        assert_eq!(args.store, StoreKind::Memory);
    }

    #[test]
    fn test_rejects_bad_default_list() {
        let mut args = Args::default();
        args.default_list = "  ".to_string();
        assert!(args.validate().is_err());

        args.default_list = "a/b".to_string();
        assert!(args.validate().is_err());
    }
}
