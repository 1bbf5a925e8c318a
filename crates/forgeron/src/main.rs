//! forgeron: build-on-upload HTTP service.
//!
//! Accepts files via HTTP's PUT method, executes a makefile against them in
//! a throwaway workspace, and returns an archive containing the build
//! products.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use forgeron::config::Config;
use forgeron::server;

#[derive(Parser, Debug)]
#[command(
    name = "forgeron",
    about = "HTTP server that accepts files via PUT, executes a makefile, and returns an archive containing the build products",
    version
)]
struct Cli {
    /// Makefile executed against every uploaded file.
    build_file: PathBuf,

    /// Port on which the HTTP server listens.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// File pattern to return to the client (repeatable; supports Unix
    /// style pathname pattern expansion).
    #[arg(short, long = "output")]
    output: Vec<String>,

    /// Kill a build that runs longer than this many seconds. Unbounded
    /// when omitted.
    #[arg(long)]
    build_timeout: Option<u64>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (pretty or json).
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level, &cli.log_format);

    let config = match Config::new(
        &cli.build_file,
        cli.output,
        cli.build_timeout.map(Duration::from_secs),
    ) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        match server::run(addr, config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: failed to serve on {}: {}", addr, e);
                ExitCode::from(1)
            }
        }
    })
}

/// Initialize tracing output. RUST_LOG wins over --log-level.
fn init_logging(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
