//! # Store State & Request Tracking
//!
//! [`StoreState`] is what views read: the mirrored data plus the `is_loading` and `error`
//! flags. [`Tracker`] is the bookkeeping behind those flags, shared by both actor kinds.
//!
//! ## Sequence tokens
//!
//! Every request takes a token from a per-store monotonic clock.
//!
//! * `is_loading` is true while any request is in flight.
//! * A fetch response is applied only if it belongs to the most recently issued fetch.
//!   Older fetches are stale and answer `Superseded`.
//! * Mutations reconciled while the latest fetch is out are kept by the actor and replayed
//!   over the fetched data, so a list taken before a mutation cannot undo it.
//! * `error` is only written by an outcome whose token is not older than the one that last
//!   wrote it. Starting a fetch claims the field and clears it.

use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::error::StoreError;
use crate::notify::{Notification, Notifier};
use std::sync::Arc;

/// Per-store request sequence number.
pub type Token = u64;

/// The observable state of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<S> {
    pub data: S,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<S: Default> Default for StoreState<S> {
    fn default() -> Self {
        Self {
            data: S::default(),
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
struct Sequencer {
    clock: Token,
    pending: usize,
    latest_fetch: Token,
    fetch_open: bool,
    error_token: Token,
}

impl Sequencer {
    fn issue(&mut self) -> Token {
        self.clock += 1;
        self.pending += 1;
        self.clock
    }

    fn settle(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    fn claim_error(&mut self, token: Token) -> bool {
        if token >= self.error_token {
            self.error_token = token;
            true
        } else {
            false
        }
    }
}

/// Loading/error bookkeeping and notification plumbing for one store.
pub(crate) struct Tracker {
    seq: Sequencer,
    error: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl Tracker {
    pub(crate) fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            seq: Sequencer::default(),
            error: None,
            notifier,
        }
    }

    /// Issues a token for a mutation.
    pub(crate) fn begin(&mut self) -> Token {
        self.seq.issue()
    }

    /// Issues a token for a fetch, which clears `error`.
    pub(crate) fn begin_fetch(&mut self) -> Token {
        let token = self.seq.issue();
        self.seq.latest_fetch = token;
        self.seq.fetch_open = true;
        self.seq.error_token = token;
        self.error = None;
        token
    }

    pub(crate) fn fetch_is_current(&self, token: Token) -> bool {
        token == self.seq.latest_fetch
    }

    /// Whether the latest fetch is still out. Mutations reconciled meanwhile must be
    /// replayed over its data.
    pub(crate) fn fetch_open(&self) -> bool {
        self.seq.fetch_open
    }

    /// Marks the latest fetch as settled.
    pub(crate) fn close_fetch(&mut self) {
        self.seq.fetch_open = false;
    }

    /// Settles a request and unwraps its envelope. Failures are reported and returned.
    pub(crate) fn finish<X>(
        &mut self,
        token: Token,
        result: ApiResult<X>,
        failure_title: &str,
    ) -> Result<Envelope<X>, StoreError> {
        self.seq.settle();
        match result {
            Ok(envelope) if envelope.success => Ok(envelope),
            Ok(envelope) => {
                let reason = envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| failure_title.to_string());
                Err(self.fail(token, StoreError::Declined(reason), failure_title))
            }
            Err(e) => Err(self.fail(token, StoreError::Transport(e), failure_title)),
        }
    }

    /// Settles a request that succeeded but must carry data.
    pub(crate) fn require<X>(
        &mut self,
        token: Token,
        envelope: Envelope<X>,
        what: &str,
        failure_title: &str,
    ) -> Result<(X, Option<String>), StoreError> {
        match envelope.data {
            Some(data) => Ok((data, envelope.message)),
            None => {
                let err = ApiError::Decode(format!("response carried no {what}"));
                Err(self.fail(token, StoreError::Transport(err), failure_title))
            }
        }
    }

    /// Writes `error` (if the token may) and emits the error notification.
    pub(crate) fn fail(&mut self, token: Token, err: StoreError, title: &str) -> StoreError {
        if self.seq.claim_error(token) {
            self.error = Some(err.to_string());
        }
        self.notifier
            .notify(Notification::error(title, err.to_string()));
        err
    }

    /// Settles a request whose response is discarded.
    pub(crate) fn discard(&mut self) -> StoreError {
        self.seq.settle();
        StoreError::Superseded
    }

    pub(crate) fn succeed(&self, title: String, description: String) {
        self.notifier.notify(Notification::success(title, description));
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.seq.pending > 0
    }

    pub(crate) fn snapshot<S>(&self, data: S) -> StoreState<S> {
        StoreState {
            data,
            is_loading: self.is_loading(),
            error: self.error.clone(),
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.seq.pending
    }
}
