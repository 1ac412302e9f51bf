use std::{sync::Arc, time::Duration};

use shared::{
    domain::{ClassificationResult, SelectionId},
    error::ValidationError,
};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

pub mod presenter;
pub mod preview;
pub mod reveal;
pub mod session;
pub mod transport;
pub mod validator;

pub use presenter::{describe, PresentationDescriptor};
pub use preview::{InMemoryPreviewStore, PreviewHandle, PreviewStore};
pub use reveal::{NoopReveal, RevealHook};
pub use session::{Phase, SessionState};
pub use transport::{ClassifierTransport, HttpClassifier};
pub use validator::{validate, CandidateFile, SelectedFile};

/// Delay before the reveal hook runs after a successful classification.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum ClientEvent {
    StateChanged(SessionState),
    SelectionRejected(ValidationError),
    StaleCompletionDiscarded(SelectionId),
    RevealResult(SelectionId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The call resolved and its state was committed.
    Completed(SessionState),
    /// The session was not `Ready`; nothing happened.
    Ignored,
    /// A newer selection (or session end) arrived while the call was in
    /// flight; its result was dropped.
    Superseded,
}

struct SessionInner {
    state: SessionState,
    current: Option<SelectionId>,
    next_selection: u64,
    preview: Option<PreviewHandle>,
}

/// One classification session: the current selection, its preview and the
/// lifecycle of its submission.
pub struct ClassifierClient {
    transport: Arc<dyn ClassifierTransport>,
    previews: Arc<dyn PreviewStore>,
    reveal: Arc<dyn RevealHook>,
    reveal_delay: Duration,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<ClientEvent>,
    /// Mirrors `SessionInner::current` for tasks that outlive the lock.
    selection_tx: watch::Sender<Option<SelectionId>>,
}

impl ClassifierClient {
    pub fn new(transport: Arc<dyn ClassifierTransport>) -> Arc<Self> {
        Self::new_with_dependencies(
            transport,
            Arc::new(InMemoryPreviewStore::new()),
            Arc::new(NoopReveal),
            DEFAULT_REVEAL_DELAY,
        )
    }

    pub fn new_with_dependencies(
        transport: Arc<dyn ClassifierTransport>,
        previews: Arc<dyn PreviewStore>,
        reveal: Arc<dyn RevealHook>,
        reveal_delay: Duration,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        let (selection_tx, _) = watch::channel(None);
        Arc::new(Self {
            transport,
            previews,
            reveal,
            reveal_delay,
            inner: Mutex::new(SessionInner {
                state: SessionState::Empty,
                current: None,
                next_selection: 0,
                preview: None,
            }),
            events,
            selection_tx,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    pub async fn preview(&self) -> Option<PreviewHandle> {
        self.inner.lock().await.preview.clone()
    }

    pub async fn current_selection(&self) -> Option<SelectionId> {
        self.inner.lock().await.current
    }

    /// Validates `candidate` and makes it the current selection.
    ///
    /// A rejected file leaves the session exactly as it was. An accepted one
    /// replaces whatever was there, including a pending submission, whose
    /// eventual result will be discarded.
    pub async fn select(&self, candidate: CandidateFile) -> Result<SelectionId, ValidationError> {
        let file = match validate(candidate) {
            Ok(file) => file,
            Err(err) => {
                warn!(error = %err, "rejected image selection");
                let _ = self.events.send(ClientEvent::SelectionRejected(err.clone()));
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        if let Some(previous) = inner.preview.take() {
            self.previews.release(previous);
        }
        inner.preview = Some(self.previews.create(&file));

        inner.next_selection += 1;
        let selection = SelectionId(inner.next_selection);
        if inner.state.is_submitting() {
            debug!(
                selection = selection.0,
                "new selection supersedes in-flight submission"
            );
        }
        info!(
            selection = selection.0,
            file = file.name(),
            size_bytes = file.size_bytes(),
            "image selected"
        );
        self.set_current(&mut inner, Some(selection));
        self.transition(&mut inner, SessionState::Ready(file));
        Ok(selection)
    }

    /// Sends the current selection for classification.
    ///
    /// Only acts from `Ready`; any other state returns
    /// [`SubmitOutcome::Ignored`] without touching the session.
    pub async fn submit(&self) -> SubmitOutcome {
        let (selection, file) = {
            let mut inner = self.inner.lock().await;
            let (Some(selection), SessionState::Ready(file)) = (inner.current, &inner.state)
            else {
                debug!(phase = %inner.state.phase(), "submit ignored outside ready state");
                return SubmitOutcome::Ignored;
            };
            let file = file.clone();
            self.transition(&mut inner, SessionState::Submitting(file.clone()));
            (selection, file)
        };

        info!(selection = selection.0, "submitting image for classification");
        let outcome = self.transport.classify(&file).await;

        let mut inner = self.inner.lock().await;
        if inner.current != Some(selection) || !inner.state.is_submitting() {
            debug!(
                selection = selection.0,
                "discarding classification result for superseded selection"
            );
            let _ = self
                .events
                .send(ClientEvent::StaleCompletionDiscarded(selection));
            return SubmitOutcome::Superseded;
        }

        let next = match outcome {
            Ok(result) => {
                info!(
                    selection = selection.0,
                    label = %result.label,
                    confidence = result.confidence,
                    "classification succeeded"
                );
                self.schedule_reveal(selection, result.clone());
                SessionState::Succeeded(file, result)
            }
            Err(err) => {
                warn!(selection = selection.0, error = %err, "classification failed");
                SessionState::Failed(file, err)
            }
        };
        self.transition(&mut inner, next);
        SubmitOutcome::Completed(inner.state.clone())
    }

    /// Ends the session: releases the preview and returns to `Empty`.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(preview) = inner.preview.take() {
            self.previews.release(preview);
        }
        self.set_current(&mut inner, None);
        self.transition(&mut inner, SessionState::Empty);
    }

    fn set_current(&self, inner: &mut SessionInner, selection: Option<SelectionId>) {
        inner.current = selection;
        self.selection_tx.send_replace(selection);
    }

    fn transition(&self, inner: &mut SessionInner, next: SessionState) {
        debug!(from = %inner.state.phase(), to = %next.phase(), "session transition");
        inner.state = next;
        let _ = self
            .events
            .send(ClientEvent::StateChanged(inner.state.clone()));
    }

    fn schedule_reveal(&self, selection: SelectionId, result: ClassificationResult) {
        let hook = Arc::clone(&self.reveal);
        let events = self.events.clone();
        let current = self.selection_tx.subscribe();
        let delay = self.reveal_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if *current.borrow() != Some(selection) {
                debug!(selection = selection.0, "skipping reveal for superseded selection");
                return;
            }
            if let Err(err) = hook.reveal(selection, &result) {
                warn!(selection = selection.0, error = %err, "result reveal failed");
                return;
            }
            let _ = events.send(ClientEvent::RevealResult(selection));
        });
    }
}

impl Drop for ClassifierClient {
    fn drop(&mut self) {
        if let Some(preview) = self.inner.get_mut().preview.take() {
            self.previews.release(preview);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
