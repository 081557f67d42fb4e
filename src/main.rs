use std::time::Duration;

use clap::Parser;

use dlnaprobe::cli::{self, Probe};
use dlnaprobe::config::{self, Config};
use dlnaprobe::http::client::DutClient;
use dlnaprobe::http::{browse, description, invalid, soap::BrowseArgs};
use dlnaprobe::ssdp::{announce, listen, search};
use dlnaprobe::verdict::Verdict;

/// Build the HTTP client, or fail the probe before any request is made.
fn dut_client(config: &Config) -> Result<DutClient, Verdict> {
    DutClient::new(config.http_timeout).map_err(Verdict::Failed)
}

async fn run_probe(probe: Probe, config: &Config) -> Option<Verdict> {
    let verdict = match probe {
        Probe::Msearch => search::msearch(&search::Search::root_device(config.search_timeout)).await,
        Probe::Alive => listen::alive(config.alive_window).await,
        Probe::Notify => listen::notify(config.notify_window).await,
        Probe::RootDesc => match dut_client(config) {
            Ok(client) => {
                let search = search::Search::root_device(config.search_timeout);
                description::root_desc(&search, &client, &config.staging()).await
            }
            Err(verdict) => verdict,
        },
        Probe::Browse {
            object_id,
            browse_flag,
            starting_index,
            requested_count,
            reference,
        } => match dut_client(config) {
            Ok(client) => {
                let args = BrowseArgs {
                    object_id,
                    browse_flag,
                    starting_index,
                    requested_count,
                    ..BrowseArgs::default()
                };
                let endpoint = config.control_endpoint();
                browse::browse(&client, &endpoint, args, &config.staging(), &reference).await
            }
            Err(verdict) => verdict,
        },
        Probe::SoapInvalid => match dut_client(config) {
            Ok(client) => invalid::soap_invalid(&client, &config.control_endpoint()).await,
            Err(verdict) => verdict,
        },
        Probe::Announce { uuid } => {
            if let Err(e) = announce::announce_byebye(&uuid, config.search_timeout).await {
                tracing::error!("announce failed: {}", e);
            }
            return None;
        }
        Probe::Monitor { duration } => {
            let duration = (duration > 0).then(|| Duration::from_secs(duration));
            if let Err(e) = listen::monitor(duration).await {
                tracing::error!("monitor failed: {}", e);
            }
            return None;
        }
    };
    Some(verdict)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr; stdout carries probe traffic and the verdict.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref()).and_then(|path| {
        match config::load_config(&path) {
            Ok(cfg) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                None
            }
        }
    });

    let config = Config::resolve(file_config, &args);
    tracing::debug!("DUT {}:{} ({:?})", config.host, config.port, args.probe);

    if let Some(verdict) = run_probe(args.probe, &config).await {
        println!("{verdict}");
        if let Some(reason) = verdict.failure() {
            println!("{reason}");
        }
    }
}
