//! Debounced preview recompilation.
//!
//! Every model mutation schedules a recompile after a short idle delay; a
//! newer schedule always cancels and replaces an older pending one, so a
//! slider drag produces one compile per idle gap rather than one per tick.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use loopscene_compose::{compose, RenderSize};
use loopscene_ir::Project;

/// Idle delay before a scheduled recompile runs.
pub const DEBOUNCE: StdDuration = StdDuration::from_millis(50);

/// A published preview: the compiled document plus a monotonically
/// increasing revision so consumers can tell reloads apart.
#[derive(Debug)]
pub struct PreviewFrame {
    pub revision: u64,
    pub svg: String,
}

#[derive(Default)]
struct DriverState {
    pending: Option<JoinHandle<()>>,
    published: Option<Arc<PreviewFrame>>,
    revision: u64,
    // Bumped on every schedule; a compile only publishes if it still holds
    // the latest generation, so a superseded task can never land late.
    generation: u64,
}

/// Cancellable scheduled-recompile driver. The previously published frame
/// is released exactly once a new one lands (or the project becomes
/// empty) — the `Arc` swap drops the old frame when its last reader lets go.
pub struct PreviewDriver {
    state: Arc<Mutex<DriverState>>,
    handle: tokio::runtime::Handle,
}

impl PreviewDriver {
    /// Create a driver bound to the current tokio runtime. Must be called
    /// from within a runtime context.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DriverState::default())),
            handle: tokio::runtime::Handle::current(),
        }
    }

    /// Schedule a recompile of `project` after the debounce delay,
    /// superseding any pending schedule. An empty project clears the
    /// published frame instead of compiling.
    pub fn schedule(&self, project: Project) {
        let mut state = self.state.lock();
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }

        state.generation += 1;
        if project.images.is_empty() {
            state.published = None;
            return;
        }

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        state.pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            let size = RenderSize::of_canvas(&project);
            match compose(&project, size) {
                Ok(svg) => {
                    let mut state = shared.lock();
                    if state.generation != generation {
                        return;
                    }
                    state.revision += 1;
                    let frame = PreviewFrame {
                        revision: state.revision,
                        svg,
                    };
                    state.published = Some(Arc::new(frame));
                    state.pending = None;
                }
                Err(e) => {
                    tracing::warn!("preview compile failed: {}", e);
                    let mut state = shared.lock();
                    if state.generation == generation {
                        state.pending = None;
                    }
                }
            }
        }));
    }

    /// The most recently published preview, if any.
    pub fn latest(&self) -> Option<Arc<PreviewFrame>> {
        self.state.lock().published.clone()
    }

    /// Whether a recompile is scheduled or running.
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }
}
