use clap::Parser;
use netsetup_core::client::UnixSetupClient;
use netsetup_core::reconcile::{DesiredConfig, Reconciler};
use netsetup_core::runstate::FileRunningConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::debug;

mod params;

use params::{ModuleParams, ModuleResult};

/// Default path of the persisted running configuration.
const RUNNING_CONFIG_PATH: &str = "/run/netsetup/running_config.json";

/// Default setup service socket.
const SETUP_SOCKET: &str = "/run/netsetup/setup.sock";

#[derive(Parser)]
#[command(name = "netsetup")]
#[command(about = "Declarative host network reconciler", long_about = None)]
struct Cli {
    /// Report whether changes would be made, without applying them
    #[arg(long)]
    check: bool,

    /// JSON parameter file (reads stdin when omitted)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Persisted running configuration
    #[arg(long, default_value = RUNNING_CONFIG_PATH)]
    running_config: PathBuf,

    /// Setup service socket
    #[arg(long, default_value = SETUP_SOCKET)]
    socket: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr; stdout carries exactly one JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match run(&cli).await {
        Ok(changed) => ModuleResult::changed(changed),
        Err(e) => ModuleResult::failed(e.to_string()),
    };

    println!("{}", result.to_json());
    std::process::exit(result.exit_code());
}

async fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let raw = match &cli.params {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };
    let params: ModuleParams = serde_json::from_slice(&raw)?;

    let desired = DesiredConfig::from_raw(params.networks, params.bondings)?;
    let options = params.options.into_setup();

    debug!(
        check = cli.check,
        networks = desired.networks.len(),
        bondings = desired.bondings.len(),
        "starting reconciliation pass"
    );

    let reconciler = Reconciler::new(
        Arc::new(FileRunningConfig::new(&cli.running_config)),
        Arc::new(UnixSetupClient::new(&cli.socket)),
    );

    if cli.check {
        Ok(reconciler.check(&desired).await?)
    } else {
        Ok(reconciler.apply(&desired, &options).await?)
    }
}
