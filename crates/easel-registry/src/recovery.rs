//! Hot-restart recovery: reconcile the in-memory registry against the
//! native windows that survived a controller restart.

use tracing::{info, warn};

use crate::lifecycle::WindowManager;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Snapshot entries synced into a matching re-registered controller.
    pub synced: usize,
    /// Orphan native windows destroyed.
    pub destroyed_orphans: usize,
}

impl WindowManager {
    /// Reconcile against the platform's live-window snapshot.
    ///
    /// Entries with a matching in-memory controller have their state synced
    /// into that controller; entries without one are orphans and get
    /// destroyed. Every failure is logged and swallowed — recovery never
    /// crashes the registry, and on failure state stays whatever it was.
    pub fn recover(&self) -> RecoveryStats {
        let snapshot = match self.platform().snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "recovery snapshot failed, keeping prior state");
                return RecoveryStats::default();
            }
        };

        let mut stats = RecoveryStats::default();
        for entry in snapshot {
            if self.registry().exists(&entry.id) {
                let synced = self.registry().with_window_mut(&entry.id, |w| {
                    w.visible = entry.visible;
                    w.size.width = entry.width;
                    w.size.height = entry.height;
                });
                match synced {
                    Ok(()) => stats.synced += 1,
                    Err(err) => {
                        warn!(id = %entry.id, error = %err, "failed to sync window, skipping")
                    }
                }
            } else {
                warn!(id = %entry.id, "orphan window detected, destroying");
                self.platform().destroy_window(&entry.id);
                stats.destroyed_orphans += 1;
            }
        }

        info!(
            synced = stats.synced,
            orphans = stats.destroyed_orphans,
            "recovery complete"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePlatform;
    use crate::platform::Platform;
    use crate::registry::WindowRegistry;
    use crate::window::{PaletteWindow, WindowConfig};
    use easel_common::{EventSink, Rect};
    use std::sync::Arc;

    fn fixture() -> (WindowManager, Arc<FakePlatform>) {
        let platform = Arc::new(FakePlatform::new());
        let sink: EventSink = Arc::new(|_| {});
        let manager = WindowManager::new(
            Arc::new(WindowRegistry::new()),
            Arc::clone(&platform) as Arc<dyn Platform>,
            sink,
        );
        (manager, platform)
    }

    #[test]
    fn matched_entries_sync_and_orphans_die() {
        let (manager, platform) = fixture();

        // Three native windows survived the restart.
        platform.seed_window("a", Rect::new(0.0, 0.0, 400.0, 300.0), true, true);
        platform.seed_window("b", Rect::new(10.0, 10.0, 200.0, 100.0), false, false);
        platform.seed_window("orphan", Rect::new(50.0, 50.0, 100.0, 100.0), true, false);

        // Only two controllers re-registered in memory.
        let registry = manager.registry();
        registry
            .store(PaletteWindow::new("a", WindowConfig::default()))
            .unwrap();
        registry
            .store(PaletteWindow::new("b", WindowConfig::default()))
            .unwrap();

        let stats = manager.recover();
        assert_eq!(
            stats,
            RecoveryStats {
                synced: 2,
                destroyed_orphans: 1
            }
        );

        // Synced controllers picked up native state.
        assert!(registry.with_window("a", |w| w.visible).unwrap());
        assert_eq!(registry.with_window("a", |w| w.size.width).unwrap(), 400.0);
        assert!(!registry.with_window("b", |w| w.visible).unwrap());

        // The orphan was destroyed natively; no command for anything else.
        assert!(platform.window("orphan").is_none());
        assert!(platform.window("a").is_some());
        assert_eq!(platform.ops(), vec!["destroy orphan"]);
    }

    #[test]
    fn no_commands_for_nonexistent_ids() {
        let (manager, platform) = fixture();
        platform.seed_window("a", Rect::default(), true, false);
        manager
            .registry()
            .store(PaletteWindow::new("a", WindowConfig::default()))
            .unwrap();

        let stats = manager.recover();
        assert_eq!(stats.synced, 1);
        assert_eq!(stats.destroyed_orphans, 0);
        assert!(platform.ops().is_empty());
    }

    #[test]
    fn snapshot_failure_leaves_state_untouched() {
        let (manager, platform) = fixture();
        manager
            .registry()
            .store(PaletteWindow::new("a", WindowConfig::default()))
            .unwrap();
        platform.fail_snapshot();

        let stats = manager.recover();
        assert_eq!(stats, RecoveryStats::default());
        assert!(!manager.registry().with_window("a", |w| w.visible).unwrap());
    }

    #[test]
    fn empty_snapshot_is_a_noop() {
        let (manager, _) = fixture();
        let stats = manager.recover();
        assert_eq!(stats, RecoveryStats::default());
    }
}
