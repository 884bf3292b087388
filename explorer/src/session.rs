//! Interactive sessions with stale-response suppression.
//!
//! A session holds the report for the token id most recently submitted.
//! Submitting a new id bumps the generation and clears the partial report;
//! results from an older generation are dropped on arrival.

use crate::engine::{Branch, BranchSink, Explorer};
use crate::error::LookupError;
use crate::report::{ReportBuilder, TokenReport};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Default)]
struct SessionState {
    status: SessionStatus,
    partial: ReportBuilder,
    report: Option<TokenReport>,
    error: Option<String>,
}

pub struct ExplorerSession {
    explorer: Arc<Explorer>,
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

struct GenerationSink<'a> {
    session: &'a ExplorerSession,
    generation: u64,
}

impl BranchSink for GenerationSink<'_> {
    fn commit(&self, branch: Branch) {
        let mut state = self.session.lock();
        if self.session.is_current(self.generation) {
            state.partial.apply(branch);
        }
    }
}

impl ExplorerSession {
    pub fn new(explorer: Arc<Explorer>) -> Self {
        Self {
            explorer,
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// The finished report of the current generation.
    pub fn report(&self) -> Option<TokenReport> {
        self.lock().report.clone()
    }

    /// User-facing message of the current generation's failure.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Which branches of the in-flight lookup have landed: (chain, metadata, trust).
    pub fn progress(&self) -> (bool, bool, bool) {
        let state = self.lock();
        (
            state.partial.chain().is_some(),
            state.partial.metadata().is_some(),
            state.partial.trust().is_some(),
        )
    }

    /// Look up `input`, superseding any lookup still in flight.
    ///
    /// Returns [`LookupError::Superseded`] when another submit started
    /// before this one finished; its result is then discarded.
    pub async fn submit(&self, input: &str) -> Result<TokenReport, LookupError> {
        let generation = {
            let mut state = self.lock();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SessionState {
                status: SessionStatus::Loading,
                ..Default::default()
            };
            generation
        };

        let result = match cashscope_types::TokenId::parse(input) {
            Ok(token) => {
                let sink = GenerationSink {
                    session: self,
                    generation,
                };
                self.explorer.lookup_with(&token, &sink).await
            }
            Err(e) => Err(LookupError::Malformed(e)),
        };

        let mut state = self.lock();
        if !self.is_current(generation) {
            if let Some(metrics) = self.explorer.metrics() {
                metrics.lookups_superseded.inc();
            }
            tracing::debug!(generation, "discarding superseded lookup");
            return Err(LookupError::Superseded);
        }
        match &result {
            Ok(report) => {
                state.status = SessionStatus::Ready;
                state.report = Some(report.clone());
            }
            Err(e) => {
                state.status = SessionStatus::Failed;
                state.error = Some(e.to_string());
            }
        }
        result
    }
}
