//! Edge Delta provider plugin binary.
//!
//! Started by the infrastructure host, which reads the handshake line from
//! stdout and connects over gRPC.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use edgedelta_provider::{
    init_logging_with_default, serve_on_with_options, serve_with_options, EdgeDeltaProvider,
    ServeOptions,
};

#[derive(Parser, Debug)]
#[command(name = "terraform-provider-edgedelta", version, about, long_about = None)]
struct Cli {
    /// Address to listen on; a free localhost port when omitted
    #[arg(long, env = "EDGEDELTA_PROVIDER_ADDR")]
    addr: Option<SocketAddr>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds to wait for in-flight requests after SIGTERM/SIGINT
    #[arg(long, default_value_t = 30)]
    shutdown_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging_with_default(&cli.log_level);

    let options =
        ServeOptions::new().with_shutdown_timeout(Duration::from_secs(cli.shutdown_timeout_secs));
    let provider = EdgeDeltaProvider::new();

    match cli.addr {
        Some(addr) => serve_on_with_options(provider, addr, options).await?,
        None => serve_with_options(provider, options).await?,
    }
    Ok(())
}
