//! easel-host: loopback host for the palette coordination stack.
//!
//! Builds the full host runtime over a headless platform, negotiates the
//! protocol across an in-process bridge, and drives a short demo session so
//! the whole path — create, reveal, drag, snap — can be observed from logs.
//! A real deployment embeds [`easel_host::HostRuntime`] behind a native
//! platform and a real transport instead.

use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::info;

use easel_bridge::{negotiator, Bridge, MemoryTransport, Negotiator};
use easel_common::{CapabilityGate, Command, EventSink, UnsupportedPolicy};
use easel_host::HostRuntime;
use easel_registry::{FakePlatform, Platform};

#[derive(Parser)]
#[command(name = "easel-host", about = "Loopback host for easel palettes")]
struct Args {
    /// Skip the demo session; just negotiate and exit.
    #[arg(long)]
    negotiate_only: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel=debug,easel_host=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Host side: headless platform + runtime, events flowing to the bridge.
    let (event_tx, event_rx) = MemoryTransport::event_channel();
    let sink: EventSink = Arc::new(move |event| {
        let _ = event_tx.send(event);
    });
    let platform = Arc::new(FakePlatform::new());
    let runtime = HostRuntime::build(Arc::clone(&platform) as Arc<dyn Platform>, sink);

    // Controller side: bridge over the in-process transport.
    let transport = Arc::new(MemoryTransport::new(runtime.router()));
    let bridge = Arc::new(Bridge::new(transport));
    let _pump = bridge.attach_events(event_rx);
    bridge.subscribe_all(|event| {
        info!(%event, "event");
        Ok(())
    });

    // The handshake gates everything else.
    let mut negotiator = Negotiator::new();
    let report = match negotiator.negotiate(&bridge).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "protocol handshake failed, aborting");
            std::process::exit(1);
        }
    };
    let capabilities = negotiator::discover_capabilities(&bridge)
        .await
        .unwrap_or_default();
    info!(
        version = report.version,
        platform = %capabilities.platform,
        "negotiated"
    );

    // Capability gaps degrade rather than crash; the gate logs each miss
    // once.
    let gate = CapabilityGate::new(capabilities, UnsupportedPolicy::WarnOnce);
    if !gate.blur().unwrap_or(false) {
        info!("blur unavailable, palettes fall back to solid fills");
    }

    if args.negotiate_only {
        return;
    }

    if let Err(err) = demo_session(&bridge, &runtime).await {
        tracing::error!(error = %err, "demo session failed");
        std::process::exit(1);
    }
}

/// Create two palettes, reveal them, and dock one against the other via the
/// drag stream.
async fn demo_session(
    bridge: &Bridge,
    runtime: &Arc<HostRuntime>,
) -> Result<(), easel_common::errors::BridgeError> {
    let fast = runtime.fast_path();

    bridge
        .send(
            Command::new("window", "create").window("toolbar").param(
                "autoSnap",
                json!({ "acceptsSnapOn": ["bottom"] }),
            ),
        )
        .await?;
    bridge
        .send(
            Command::new("window", "create")
                .window("inspector")
                .param("autoSnap", json!({ "canSnapFrom": ["top"] })),
        )
        .await?;

    bridge
        .send(
            Command::new("visibility", "show")
                .window("toolbar")
                .param("x", 200.0)
                .param("y", 100.0),
        )
        .await?;
    bridge
        .send(
            Command::new("visibility", "show")
                .window("inspector")
                .param("x", 600.0)
                .param("y", 500.0),
        )
        .await?;

    // The content layer reports sizes over the fast path; this completes
    // both reveals.
    fast.resize("toolbar", 400.0, 60.0).ok();
    fast.resize("inspector", 300.0, 200.0).ok();

    // Drag the inspector up under the toolbar until it snaps.
    bridge
        .send(Command::new("frame", "dragStarted").window("inspector"))
        .await?;
    for y in [400.0, 300.0, 250.0, 190.0] {
        bridge
            .send(
                Command::new("frame", "dragMoved")
                    .window("inspector")
                    .param("x", 220.0)
                    .param("y", y),
            )
            .await?;
    }
    bridge
        .send(
            Command::new("frame", "dragEnded")
                .window("inspector")
                .param("x", 220.0)
                .param("y", 190.0),
        )
        .await?;

    let distance = bridge
        .send(Command::new("snap", "getSnapDistance").param("followerId", "inspector"))
        .await?;
    info!(%distance, bindings = runtime.coordinator().bindings().len(), "demo complete");

    // Let the event pump drain before exiting.
    tokio::task::yield_now().await;
    Ok(())
}
