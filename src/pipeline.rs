// Resource lifecycle manager: one preview slot per consumer

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::decode;
use crate::format::classify;
use crate::preview::{Normalizer, PreviewLimits, PreviewResult};
use crate::types::{PipelineError, PipelineResult};
use crate::upload::UploadedFile;

/// Where a consumer's preview slot currently stands. `Ready` shares the
/// result by `Arc` so snapshots stay cheap; the slot remains the owner for
/// release purposes.
#[derive(Debug, Clone)]
pub enum PreviewState {
    Idle,
    Reading,
    Ready(Arc<PreviewResult>),
    Failed(PipelineError),
}

impl PreviewState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PreviewState::Idle)
    }

    pub fn is_reading(&self) -> bool {
        matches!(self, PreviewState::Reading)
    }
}

struct Slot {
    state: PreviewState,
}

impl Slot {
    /// The single cleanup path. Every transition funnels through here so a
    /// held revocable reference is released on every way out of `Ready`,
    /// teardown included.
    fn replace(&mut self, next: PreviewState) {
        let prior = std::mem::replace(&mut self.state, next);
        if let PreviewState::Ready(result) = prior {
            result.release();
        }
    }
}

/// Runs classify → read → decode → normalize for one file, with no slot
/// involved. Useful for one-shot consumers that manage no lifecycle.
pub async fn preview_file(
    file: &UploadedFile,
    limits: PreviewLimits,
) -> PipelineResult<PreviewResult> {
    let normalizer = Normalizer::new(limits);
    run(&normalizer, file).await
}

async fn run(normalizer: &Normalizer, file: &UploadedFile) -> PipelineResult<PreviewResult> {
    let format = classify(file.name(), file.content_type())?;
    let decoded = decode::decode(format, file).await?;
    Ok(normalizer.normalize(decoded))
}

/// Drives the preview slot for one consumer. Exactly one pipeline is in
/// flight at a time from the consumer's point of view: selecting a new file
/// does not cancel a pending read, but only the result matching the current
/// selection token may commit. Stale results are discarded and their
/// revocable references released on the spot.
pub struct Previewer {
    normalizer: Normalizer,
    slot: Arc<Mutex<Slot>>,
    token: Arc<AtomicU64>,
}

impl Previewer {
    pub fn new(limits: PreviewLimits) -> Self {
        Self {
            normalizer: Normalizer::new(limits),
            slot: Arc::new(Mutex::new(Slot {
                state: PreviewState::Idle,
            })),
            token: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Supplies a new file. Any previously held preview is released
    /// immediately, before the new read begins; the slot then moves to
    /// `Reading` and the pipeline runs on the tokio runtime without
    /// blocking the caller. The returned handle resolves when this
    /// selection's pipeline has either committed or been discarded.
    pub fn select(&self, file: UploadedFile) -> JoinHandle<()> {
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut slot = self.slot.lock().expect("preview slot poisoned");
            slot.replace(PreviewState::Reading);
        }
        debug!("selection {token}: reading {}", file.name());

        let slot = Arc::clone(&self.slot);
        let current = Arc::clone(&self.token);
        let normalizer = self.normalizer;
        tokio::spawn(async move {
            let outcome = run(&normalizer, &file).await;

            let mut slot = slot.lock().expect("preview slot poisoned");
            if current.load(Ordering::SeqCst) != token {
                // A newer selection superseded this one while the read was
                // pending. Discard, releasing any reference right away.
                if let Ok(result) = &outcome {
                    result.release();
                }
                debug!("selection {token}: stale result for {} discarded", file.name());
                return;
            }
            match outcome {
                Ok(result) => {
                    debug!("selection {token}: {} ready", file.name());
                    slot.replace(PreviewState::Ready(Arc::new(result)));
                }
                Err(err) => {
                    warn!("selection {token}: preview of {} failed: {err}", file.name());
                    slot.replace(PreviewState::Failed(err));
                }
            }
        })
    }

    /// Drops whatever the slot holds and returns to `Idle`, invalidating
    /// any in-flight pipeline.
    pub fn clear(&self) {
        self.token.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.slot.lock().expect("preview slot poisoned");
        slot.replace(PreviewState::Idle);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PreviewState {
        self.slot.lock().expect("preview slot poisoned").state.clone()
    }

    /// The live preview, if the slot is `Ready`.
    pub fn current(&self) -> Option<Arc<PreviewResult>> {
        match &self.slot.lock().expect("preview slot poisoned").state {
            PreviewState::Ready(result) => Some(Arc::clone(result)),
            _ => None,
        }
    }
}

impl Default for Previewer {
    fn default() -> Self {
        Self::new(PreviewLimits::default())
    }
}

impl Drop for Previewer {
    fn drop(&mut self) {
        // Teardown behaves like any other transition out of Ready.
        self.clear();
    }
}
