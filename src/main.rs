use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::{mpsc, watch};

use nearboard::config::{Config, ConfigStore, CredentialStore, SecureString};
use nearboard::location::{IpGeolocator, LocationResolver};
use nearboard::logging;
use nearboard::refresh::{RefreshOrchestrator, RefreshRunner};
use nearboard::shutdown::ShutdownHandle;
use nearboard::transit::{Coordinates, TflClient};
use nearboard::ui::app::App;
use nearboard::ui::dashboard::DashboardState;
use nearboard::ui::view::render;

/// Nearby bus stops and Tube stations with live arrivals.
#[derive(Parser, Debug)]
#[command(name = "nearboard", version, about)]
struct Cli {
    /// Config file (default: <config dir>/nearboard/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Search around this latitude instead of the device location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Search around this longitude instead of the device location.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Start with the fixed test location enabled.
    #[arg(long)]
    test_location: bool,

    /// TfL API key; saved for later runs.
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Refresh once, print the dashboard as text, and exit.
    #[arg(long)]
    once: bool,

    /// Log file (default: <cache dir>/nearboard/nearboard.log).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn location_override(cli: &Cli) -> anyhow::Result<Option<Coordinates>> {
    let Some((lat, lon)) = cli.lat.zip(cli.lon) else {
        return Ok(None);
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("--lat/--lon out of range: {}, {}", lat, lon);
    }
    Ok(Some(Coordinates::new(lat, lon)))
}

fn build_resolver(
    config: &Config,
    override_coordinates: Option<Coordinates>,
    test_location: bool,
) -> anyhow::Result<LocationResolver<IpGeolocator>> {
    let location = &config.location;
    let device = match location.geolocation_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Some(
            IpGeolocator::new(url, location.timeout()).context("building geolocation client")?,
        ),
        _ => None,
    };

    Ok(LocationResolver::new(
        device,
        Coordinates::new(location.test_latitude, location.test_longitude),
        location.timeout(),
    )
    .with_override(override_coordinates)
    .with_test_location(test_location))
}

fn load_credential(cli: &Cli, store: &CredentialStore) -> anyhow::Result<SecureString> {
    match &cli.api_key {
        Some(key) => {
            let key = SecureString::new(key.trim());
            store.save(&key).context("saving API key")?;
            Ok(key)
        }
        None => store.load().context("loading API key"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config_store = ConfigStore::open(config_path).context("loading configuration")?;
    if let Some(file) = &cli.log_file {
        config_store.update(|config| config.logging.file = Some(file.clone()));
    }
    let config = config_store.get();

    let log_path = logging::init_tracing(&config.logging).context("opening log file")?;
    tracing::info!(
        config = %config_store.path().display(),
        log = %log_path.display(),
        "Starting nearboard"
    );

    let credentials =
        CredentialStore::in_dir(config_store.path().parent().unwrap_or(Path::new(".")));
    let credential = load_credential(&cli, &credentials)?;

    let resolver = build_resolver(&config, location_override(&cli)?, cli.test_location)?;
    let api = TflClient::new(&config.api).context("building transit API client")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    if cli.once {
        let (state_tx, _state_rx) = watch::channel(DashboardState::default());
        let mut orchestrator = RefreshOrchestrator::new(resolver, api, state_tx, credential);
        runtime.block_on(orchestrator.refresh_full());
        print!("{}", render(orchestrator.state()));
        return Ok(());
    }

    let (state_tx, state_rx) = watch::channel(DashboardState::initial());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let shutdown = ShutdownHandle::new();

    let orchestrator = RefreshOrchestrator::new(resolver, api, state_tx, credential);
    let runner = RefreshRunner::new(
        orchestrator,
        command_rx,
        config.refresh.interval(),
        shutdown.clone(),
    );
    let runner_task = runtime.spawn(runner.run());

    let signal_shutdown = shutdown.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.signal();
        }
    });

    let app = App::new(state_rx, command_tx, credentials, cli.test_location);
    let result = nearboard::ui::runtime::run(app, shutdown.clone());

    shutdown.signal();
    runtime.block_on(async {
        if tokio::time::timeout(Duration::from_secs(2), runner_task)
            .await
            .is_err()
        {
            tracing::warn!("Refresh runner did not stop in time");
        }
    });
    runtime.shutdown_timeout(Duration::from_millis(500));

    result.context("terminal UI failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["nearboard", "--lat", "51.5"]).is_err());
        let cli = Cli::try_parse_from(["nearboard", "--lat", "51.5", "--lon", "-0.17"]).unwrap();
        assert_eq!(
            location_override(&cli).unwrap(),
            Some(Coordinates::new(51.5, -0.17))
        );
    }

    #[test]
    fn override_out_of_range_is_rejected() {
        let cli = Cli::try_parse_from(["nearboard", "--lat", "95", "--lon", "0"]).unwrap();
        assert!(location_override(&cli).is_err());
    }

    #[test]
    fn no_override_by_default() {
        let cli = Cli::try_parse_from(["nearboard"]).unwrap();
        assert_eq!(location_override(&cli).unwrap(), None);
        assert!(!cli.once);
        assert!(!cli.test_location);
    }
}
