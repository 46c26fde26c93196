use commsys::{CommConfig, CommManager, CommSystem, TransportRegistry};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config_path = Path::new("commsys.yaml");
    let config = match CommConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error loading config: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        inbound_kbps = config.bandwidth.inbound_kbps,
        outbound_kbps = config.bandwidth.outbound_kbps,
        active_window_ms = config.peers.active_window_ms(),
        "loaded comm configuration"
    );

    let registry = Arc::new(TransportRegistry::new());
    let comm = CommManager::new(registry.clone(), config);

    // No transports are registered yet; every answer below is the
    // conservative startup default.
    comm.refresh_reachability();
    info!(
        status = %comm.reachability_status(),
        transports = registry.len(),
        active_peers = comm.count_active_peers(),
        inbound_capacity = comm.have_inbound_capacity(50),
        outbound_capacity = comm.have_outbound_capacity(50),
        "comm subsystem ready"
    );
}
