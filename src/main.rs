use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use socialgraph::{config, server};

#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// SocialGraph - HTTP backend for a TypeDB social network
///
/// Settings come from the environment (and `.env`), or from a YAML file
/// with `--config`; any flag given on the command line overrides both.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP server host address
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port
    #[arg(long)]
    http_port: Option<u16>,

    /// TypeDB server address (host:port)
    #[arg(long)]
    typedb_address: Option<String>,

    #[arg(long)]
    typedb_username: Option<String>,

    #[arg(long)]
    typedb_password: Option<String>,

    /// Connect to TypeDB over TLS
    #[arg(long)]
    typedb_tls: bool,

    /// TypeDB database name
    #[arg(long)]
    typedb_database: Option<String>,

    /// Maximum number of place containment levels walked for a page
    #[arg(long)]
    max_hierarchy_depth: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_cli_config(self, base: config::ServerConfig) -> config::CliConfig {
        config::CliConfig {
            http_host: self.http_host.unwrap_or(base.http_host),
            http_port: self.http_port.unwrap_or(base.http_port),
            typedb_address: self.typedb_address.unwrap_or(base.typedb.address),
            typedb_username: self.typedb_username.unwrap_or(base.typedb.username),
            typedb_password: self.typedb_password.unwrap_or(base.typedb.password),
            typedb_tls_enabled: self.typedb_tls || base.typedb.tls_enabled,
            typedb_database: self.typedb_database.unwrap_or(base.typedb.database),
            max_hierarchy_depth: self.max_hierarchy_depth.unwrap_or(base.max_hierarchy_depth),
            request_timeout_secs: self.request_timeout_secs.unwrap_or(base.request_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();

    println!("\nSocialGraph v{}\n", env!("CARGO_PKG_VERSION"));

    let base = match cli.config.take() {
        Some(path) => config::ServerConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => config::ServerConfig::from_env().context("loading configuration from environment")?,
    };
    let config = config::ServerConfig::from_cli(cli.into_cli_config(base))
        .context("validating command line configuration")?;

    server::run_with_config(config).await;
    Ok(())
}
