//! # Quad Bridge Runtime
//!
//! Runs two ledger domains joined by a bridge and walks one region round trip:
//!
//! 1. Load configuration (`QB_*` environment variables)
//! 2. Build domain A and domain B, pair their endpoints
//! 3. Mint a 24x24 quad to a holder on A
//! 4. Bridge a 12x12 part of it to a recipient on B
//! 5. Bridge it back and wait until the 24x24 is whole again on A
//!
//! The relay is ticked by a background task until the demo finishes or
//! Ctrl-C is received.

use anyhow::{bail, Context, Result};
use bridge_runtime::{BridgeNetwork, BridgeRuntime, RuntimeConfig};
use qb_01_quad_ledger::Region;
use shared_types::Account;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Upper bound on relay ticks to wait for one delivery.
const MAX_WAIT_TICKS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level()?)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Quad Bridge Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(config = %serde_json::to_string(&config)?, "Configuration loaded");

    let admin = Account::from_low_u64(0xAD);
    let network = BridgeNetwork::new(&config, admin).context("failed to build network")?;
    let runtime = BridgeRuntime::new(network, config.tick_interval());
    let pump = runtime.spawn_pump();

    tokio::select! {
        result = run_round_trip(&runtime, &config, admin) => {
            match &result {
                Ok(()) => info!("Round trip complete"),
                Err(err) => warn!(error = %err, "Round trip failed"),
            }
            runtime.shutdown();
            pump.await?;
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            runtime.shutdown();
            pump.await?;
            Ok(())
        }
    }
}

async fn run_round_trip(runtime: &BridgeRuntime, config: &RuntimeConfig, admin: Account) -> Result<()> {
    let holder = Account::from_low_u64(0xA11CE);
    let recipient = Account::from_low_u64(0xB0B);
    let whole = Region::new(24, 0, 0)?;
    let part = Region::new(12, 12, 12)?;
    let (a, b) = (config.domain_a, config.domain_b);

    {
        let network = runtime.network();
        let mut net = network.lock();
        net.domain_mut(a)?
            .ledger
            .mint(admin, holder, whole, b"genesis")?;
        let id = net.bridge(a, holder, recipient, &[part], b"outbound")?;
        info!(id = %id, region = %part, "Bridging {} -> {}", a, b);
    }

    let arrived = runtime
        .wait_until(MAX_WAIT_TICKS, |net| {
            net.domain(b)
                .map(|d| d.ledger.owner_of(part.id()) == Ok(recipient))
                .unwrap_or(false)
        })
        .await;
    if !arrived {
        bail!("region {part} never arrived on {b}");
    }
    info!(region = %part, owner = %recipient, "Region released on {}", b);

    {
        let network = runtime.network();
        let mut net = network.lock();
        let id = net.bridge(b, recipient, holder, &[part], b"return")?;
        info!(id = %id, region = %part, "Bridging {} -> {}", b, a);
    }

    let restored = runtime
        .wait_until(MAX_WAIT_TICKS, |net| {
            net.domain(a)
                .map(|d| d.ledger.exists(whole) && d.ledger.owner_of(whole.id()) == Ok(holder))
                .unwrap_or(false)
        })
        .await;
    if !restored {
        bail!("region {whole} was not restored on {a}");
    }

    let network = runtime.network();
    let net = network.lock();
    let domain_a = net.domain(a)?;
    let domain_b = net.domain(b)?;
    info!(
        holder_cells = domain_a.ledger.balance_of(&holder),
        records_a = domain_a.ledger.record_count(),
        custody_b = domain_b.ledger.balance_of(&domain_b.endpoint.account()),
        "Final state"
    );
    Ok(())
}
