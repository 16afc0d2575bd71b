//! Whole-stack session tests: controller bridge ↔ service router over the
//! in-process transport, with events flowing back through the pump.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use easel_bridge::{negotiator, Bridge, MemoryTransport, Negotiator};
use easel_common::{Command, Event, EventSink, Point, Rect};
use easel_host::HostRuntime;
use easel_registry::{FakePlatform, Platform};

struct Session {
    bridge: Arc<Bridge>,
    runtime: Arc<HostRuntime>,
    platform: Arc<FakePlatform>,
    events: Arc<Mutex<Vec<Event>>>,
}

fn session() -> Session {
    let (event_tx, event_rx) = MemoryTransport::event_channel();
    let sink: EventSink = Arc::new(move |event| {
        let _ = event_tx.send(event);
    });
    let platform = Arc::new(FakePlatform::new());
    let runtime = HostRuntime::build(Arc::clone(&platform) as Arc<dyn Platform>, sink);

    let bridge = Arc::new(Bridge::new(Arc::new(MemoryTransport::new(
        runtime.router(),
    ))));
    let _pump = bridge.attach_events(event_rx);

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&events);
    bridge.subscribe_all(move |event| {
        record.lock().unwrap().push(event.clone());
        Ok(())
    });

    Session {
        bridge,
        runtime,
        platform,
        events,
    }
}

async fn drain() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

fn names(events: &Arc<Mutex<Vec<Event>>>) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .map(|e| format!("{}.{}", e.service, e.event))
        .collect()
}

#[tokio::test]
async fn negotiation_gates_and_succeeds() {
    let s = session();
    let mut negotiator = Negotiator::new();
    let report = negotiator.negotiate(&s.bridge).await.unwrap();
    assert_eq!(report.version, 1);

    let caps = negotiator::discover_capabilities(&s.bridge).await.unwrap();
    assert!(caps.content_sizing);
    assert!(!caps.blur);
}

#[tokio::test]
async fn create_reveal_and_observe_shown_event() {
    let s = session();

    s.bridge
        .send(Command::new("window", "create").window("w1"))
        .await
        .unwrap();
    s.bridge
        .send(
            Command::new("visibility", "show")
                .window("w1")
                .param("x", 50.0)
                .param("y", 60.0),
        )
        .await
        .unwrap();

    // Still staged: no shown event until the content layer reports a size.
    drain().await;
    assert!(names(&s.events).is_empty());

    s.runtime.fast_path().resize("w1", 320.0, 200.0).unwrap();
    drain().await;

    assert_eq!(names(&s.events), vec!["visibility.shown"]);
    let shown = &s.events.lock().unwrap()[0];
    assert_eq!(shown.window_id.as_deref(), Some("w1"));
    assert_eq!(shown.data["width"], 320.0);
    // Native geometry was already final when the event fired.
    assert_eq!(
        s.platform.frame("w1").unwrap(),
        Rect::new(50.0, 60.0, 320.0, 200.0)
    );
}

#[tokio::test]
async fn drag_to_snap_full_loop() {
    let s = session();
    let fast = s.runtime.fast_path();

    for (id, auto) in [
        ("toolbar", json!({ "acceptsSnapOn": ["bottom"] })),
        ("inspector", json!({ "canSnapFrom": ["top"] })),
    ] {
        s.bridge
            .send(Command::new("window", "create").window(id).param("autoSnap", auto))
            .await
            .unwrap();
    }
    s.bridge
        .send(
            Command::new("visibility", "show")
                .window("toolbar")
                .param("x", 200.0)
                .param("y", 100.0),
        )
        .await
        .unwrap();
    s.bridge
        .send(
            Command::new("visibility", "show")
                .window("inspector")
                .param("x", 600.0)
                .param("y", 500.0),
        )
        .await
        .unwrap();
    fast.resize("toolbar", 400.0, 60.0).unwrap();
    fast.resize("inspector", 300.0, 200.0).unwrap();

    s.bridge
        .send(Command::new("frame", "dragStarted").window("inspector"))
        .await
        .unwrap();
    s.bridge
        .send(
            Command::new("frame", "dragMoved")
                .window("inspector")
                .param("x", 220.0)
                .param("y", 190.0),
        )
        .await
        .unwrap();
    s.bridge
        .send(
            Command::new("frame", "dragEnded")
                .window("inspector")
                .param("x", 220.0)
                .param("y", 190.0),
        )
        .await
        .unwrap();
    drain().await;

    // Exactly one binding committed.
    let bindings = s.runtime.coordinator().bindings();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].follower_id, "inspector");
    assert_eq!(bindings[0].target_id, "toolbar");

    let snap_events: Vec<String> = s
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.service == "snap")
        .map(|e| e.event.clone())
        .collect();
    assert_eq!(
        snap_events,
        vec!["dragStarted", "proximityEntered", "snapped"]
    );

    // Snapped geometry: below the toolbar with the default gap, centered.
    let frame = s.platform.frame("inspector").unwrap();
    assert_eq!(frame.origin(), Point::new(250.0, 164.0));

    // Moving the toolbar tows the inspector along.
    s.bridge
        .send(
            Command::new("frame", "setPosition")
                .window("toolbar")
                .param("x", 500.0)
                .param("y", 300.0),
        )
        .await
        .unwrap();
    let frame = s.platform.frame("inspector").unwrap();
    assert_eq!(frame.origin(), Point::new(550.0, 364.0));
}

#[tokio::test]
async fn destroying_snap_target_applies_policy_end_to_end() {
    let s = session();
    let fast = s.runtime.fast_path();

    for id in ["target", "follower"] {
        s.bridge
            .send(Command::new("window", "create").window(id))
            .await
            .unwrap();
        s.bridge
            .send(
                Command::new("visibility", "show")
                    .window(id)
                    .param("x", 100.0)
                    .param("y", 100.0),
            )
            .await
            .unwrap();
        fast.resize(id, 200.0, 100.0).unwrap();
    }

    s.bridge
        .send(
            Command::new("snap", "snap")
                .param("followerId", "follower")
                .param("targetId", "target")
                .param("followerEdge", "top")
                .param("targetEdge", "bottom")
                .param("config", json!({ "onTargetDestroyed": "hideAndDetach" })),
        )
        .await
        .unwrap();
    assert_eq!(s.runtime.coordinator().bindings().len(), 1);

    s.bridge
        .send(Command::new("window", "destroy").window("target"))
        .await
        .unwrap();
    drain().await;

    assert!(s.runtime.coordinator().bindings().is_empty());
    assert!(!s.runtime.manager().is_visible("follower"));
    let all = names(&s.events);
    assert!(all.contains(&"window.destroyed".to_string()));
    assert!(all.contains(&"visibility.hidden".to_string()));
}

#[tokio::test]
async fn recovery_destroys_orphans_and_syncs_survivors() {
    let s = session();

    // One controller re-registered after the restart; the platform still
    // holds two live native windows (seeded over the fresh create to mimic
    // the survived native state).
    s.bridge
        .send(Command::new("window", "create").window("kept"))
        .await
        .unwrap();
    s.platform
        .seed_window("kept", Rect::new(5.0, 5.0, 100.0, 100.0), true, false);
    s.platform
        .seed_window("orphan", Rect::new(9.0, 9.0, 50.0, 50.0), true, false);

    let stats = s.runtime.manager().recover();
    assert_eq!(stats.synced, 1);
    assert_eq!(stats.destroyed_orphans, 1);
    assert!(s.platform.window("orphan").is_none());
    assert!(s.runtime.manager().is_visible("kept"));

    // The snapshot the controller sees afterwards no longer lists the orphan.
    let snapshot = s
        .bridge
        .send(Command::new("host", "getSnapshot"))
        .await
        .unwrap();
    let ids: Vec<&str> = snapshot
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"kept"));
    assert!(!ids.contains(&"orphan"));
}

#[tokio::test]
async fn per_service_event_order_is_preserved() {
    let s = session();
    let fast = s.runtime.fast_path();

    s.bridge
        .send(Command::new("window", "create").window("w1"))
        .await
        .unwrap();
    s.bridge
        .send(Command::new("visibility", "show").window("w1"))
        .await
        .unwrap();
    fast.resize("w1", 100.0, 100.0).unwrap();
    s.bridge
        .send(Command::new("visibility", "hide").window("w1"))
        .await
        .unwrap();
    drain().await;

    let visibility: Vec<String> = s
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.service == "visibility")
        .map(|e| e.event.clone())
        .collect();
    assert_eq!(visibility, vec!["shown", "hidden"]);
}

#[tokio::test]
async fn message_send_round_trips_to_subscribers() {
    let s = session();
    s.bridge.send_fire_and_forget(
        Command::new("message", "send")
            .window("w1")
            .param("topic", "refresh"),
    );
    drain().await;

    let events = s.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].service, "message");
    assert_eq!(events[0].data["topic"], "refresh");
}
