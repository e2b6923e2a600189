//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;
use pollme_core::reader::ReaderConfig;
use pollme_polls::StoreConfig;

/// pollme HTTP gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "pollme-gateway")]
#[command(about = "HTTP gateway for pollme")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    pub listen: String,

    /// Directory of the poll database. A temporary database is used when unset.
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Apps to reflect (full name, short name or label), comma separated.
    /// All apps are reflected when empty.
    #[arg(long, value_delimiter = ',')]
    pub include_apps: Vec<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Directory of the poll database.
    pub data_dir: Option<PathBuf>,
    /// App allow-list for the schema reader.
    pub included_apps: Vec<String>,
    /// Default log filter.
    pub log_level: String,
}

impl GatewayConfig {
    /// Schema reader configuration for this gateway.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::new().with_included_apps(self.included_apps.iter().cloned())
    }

    /// Poll store configuration for this gateway.
    pub fn store_config(&self) -> StoreConfig {
        match &self.data_dir {
            Some(dir) => StoreConfig::new(dir),
            None => StoreConfig::temporary(),
        }
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_dir: args.data_dir.clone(),
            included_apps: args
                .include_apps
                .iter()
                .map(|app| app.trim().to_string())
                .filter(|app| !app.is_empty())
                .collect(),
            log_level: args.log_level.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            data_dir: None,
            included_apps: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}
