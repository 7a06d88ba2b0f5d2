//! Watch mode: rebuild when markdown sources change.
//!
//! ```text
//! notify watcher → std channel → bridge thread → tokio channel → debounce → handle_hot_update
//! ```
//!
//! Rebuilds are awaited inside the event loop, so two runs never overlap.
//! Changes arriving during a run are queued and handled afterwards.

use std::collections::BTreeSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use md2web_shared::path::{is_temp_file, is_within};
use md2web_shared::{Md2WebError, Result};

use crate::pipeline::ProgressReporter;
use crate::plugin::Md2Web;

/// Capacity of the bridge channel between the watcher thread and the loop.
const EVENT_BUFFER: usize = 256;

/// Watch the plugin's scan root until `shutdown` resolves.
///
/// Changes are collected until `debounce` passes without a new one, then
/// the pipeline runs once for the whole batch. A failed run is logged and
/// watching continues.
pub async fn watch(
    plugin: &Md2Web,
    debounce: Duration,
    progress: &dyn ProgressReporter,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let root = plugin.watch_root().to_path_buf();
    // Backends may report canonical paths (e.g. /private/var on macOS).
    let canonical_root = tokio::fs::canonicalize(&root)
        .await
        .unwrap_or_else(|_| root.clone());

    let (notify_tx, notify_rx) = std::sync::mpsc::channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .map_err(|e| Md2WebError::Watch(format!("failed to create watcher: {e}")))?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| Md2WebError::Watch(format!("failed to watch {}: {e}", root.display())))?;

    let (path_tx, mut path_rx) = mpsc::channel::<PathBuf>(EVENT_BUFFER);
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) if is_content_change(&event.kind) => {
                    for path in event.paths {
                        if path_tx.blocking_send(path).is_err() {
                            return;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "notify error"),
            }
        }
    });

    info!(root = %root.display(), debounce_ms = debounce.as_millis(), "watching for changes");

    let mut pending: BTreeSet<PathBuf> = BTreeSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("watcher shutting down");
                break;
            }
            received = path_rx.recv() => {
                let Some(path) = received else {
                    return Err(Md2WebError::Watch("watcher channel closed".into()));
                };
                let path = rebase(path, &canonical_root, &root);
                if is_generated(plugin, &path) {
                    debug!(path = %path.display(), "ignoring change");
                } else {
                    pending.insert(path);
                }
            }
            _ = tokio::time::sleep(debounce), if !pending.is_empty() => {
                let batch = std::mem::take(&mut pending);
                rebuild(plugin, &batch, progress).await;
            }
        }
    }

    drop(watcher);
    Ok(())
}

/// Run the pipeline once for a debounced batch of changed paths.
async fn rebuild(plugin: &Md2Web, batch: &BTreeSet<PathBuf>, progress: &dyn ProgressReporter) {
    let Some(trigger) = batch.iter().find(|path| plugin.watches(path)) else {
        return;
    };

    info!(changed = batch.len(), "change batch ready");
    match plugin.handle_hot_update(trigger, progress).await {
        Ok(Some(report)) => debug!(files = report.files, "rebuild complete"),
        Ok(None) => {}
        Err(e) => error!(error = %e, "rebuild failed"),
    }
}

/// Creations, removals, renames and data writes. Access and metadata-only
/// events are dropped so reading sources during a run cannot retrigger it.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Editor scratch files and files this pipeline writes itself.
fn is_generated(plugin: &Md2Web, path: &Path) -> bool {
    let config = plugin.config();
    is_temp_file(path)
        || config
            .components_dir
            .as_deref()
            .is_some_and(|dir| is_within(path, dir))
        || config.route_file_path.as_deref() == Some(path)
}

/// Map a path reported under the canonical root back under the configured root.
fn rebase(path: PathBuf, canonical_root: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(canonical_root) {
        Ok(rest) if canonical_root != root => root.join(rest),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2web_shared::Md2WebConfig;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};

    use crate::pipeline::SilentProgress;

    #[test]
    fn content_change_kinds() {
        assert!(is_content_change(&EventKind::Create(CreateKind::File)));
        assert!(is_content_change(&EventKind::Remove(RemoveKind::File)));
        assert!(is_content_change(&EventKind::Modify(ModifyKind::Data(
            DataChange::Any
        ))));
        assert!(!is_content_change(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Any
        ))));
        assert!(!is_content_change(&EventKind::Access(AccessKind::Any)));
    }

    #[test]
    fn generated_outputs_are_ignored() {
        let config = Md2WebConfig {
            components_dir: Some("docs/generated".into()),
            route_file_path: Some("docs/routes.ts".into()),
            ..Md2WebConfig::default()
        };
        let plugin = Md2Web::new(config, "/p").unwrap();

        assert!(is_generated(&plugin, Path::new("/p/docs/generated/a/index.vue")));
        assert!(is_generated(&plugin, Path::new("/p/docs/routes.ts")));
        assert!(is_generated(&plugin, Path::new("/p/docs/.a.md.swp")));
        assert!(!is_generated(&plugin, Path::new("/p/docs/a.md")));
    }

    #[test]
    fn rebase_maps_canonical_paths() {
        let rebased = rebase(
            PathBuf::from("/private/var/p/docs/a.md"),
            Path::new("/private/var/p/docs"),
            Path::new("/var/p/docs"),
        );
        assert_eq!(rebased, PathBuf::from("/var/p/docs/a.md"));

        let untouched = rebase(
            PathBuf::from("/p/docs/a.md"),
            Path::new("/p/docs"),
            Path::new("/p/docs"),
        );
        assert_eq!(untouched, PathBuf::from("/p/docs/a.md"));
    }

    #[tokio::test]
    async fn missing_root_is_watch_error() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = Md2Web::new(Md2WebConfig::default(), dir.path()).unwrap();

        let err = watch(
            &plugin,
            Duration::from_millis(10),
            &SilentProgress,
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Md2WebError::Watch(_)));
    }

    #[tokio::test]
    async fn new_source_is_generated() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();

        let plugin = Md2Web::new(Md2WebConfig::default(), dir.path()).unwrap();
        let component = dir.path().join("src/docs/fresh/index.vue");
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            std::fs::write(docs.join("fresh.md"), "# Fresh").unwrap();

            let mut appeared = false;
            for _ in 0..100 {
                if component.exists() {
                    appeared = true;
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let _ = stop_tx.send(());
            appeared
        };

        let shutdown = async {
            let _ = stop_rx.await;
        };
        let (watched, appeared) = tokio::join!(
            watch(&plugin, Duration::from_millis(50), &SilentProgress, shutdown),
            driver,
        );

        watched.unwrap();
        assert!(appeared, "component was not generated after the change");
        let content = std::fs::read_to_string(&component).unwrap();
        assert!(content.contains("<h1>Fresh</h1>"));
    }
}
