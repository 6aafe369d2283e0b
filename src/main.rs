use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use rootwalk::resolver::{
    Resolver, ResolverConfig, RootFailurePolicy, Session, DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT,
};
use rootwalk::transport::{UdpTransport, DNS_PORT};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rootwalk")]
#[command(version)]
#[command(about = "Look up CNAME, A, AAAA and MX records by walking down from the DNS root")]
struct Cli {
    /// DNS name(s) to look up
    #[arg(value_name = "NAME", required = true)]
    names: Vec<String>,

    /// Seconds to wait for each server
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// How deep CNAME targets and name server names may nest
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Move on to the next root server when one does not answer
    #[arg(long)]
    try_all_roots: bool,

    /// Port queries are sent to
    #[arg(long, default_value_t = DNS_PORT)]
    port: u16,

    /// Log level (trace, debug, info, warn, error), RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config = ResolverConfig {
        timeout: Duration::from_secs(cli.timeout),
        max_depth: cli.max_depth,
        root_failure: if cli.try_all_roots {
            RootFailurePolicy::TryNextRoot
        } else {
            RootFailurePolicy::FailFast
        },
        ..Default::default()
    };
    let resolver = Resolver::with_config(UdpTransport::with_port(cli.port), config);

    let mut session = Session::new();

    for domain in &cli.names {
        match resolver.info(domain, &mut session).await {
            Ok(info) => print!("{info}"),
            Err(err) => eprintln!("{domain}: {err}"),
        }

        debug!(%domain, queries = session.take_queries(), "lookup finished");
    }

    Ok(())
}
