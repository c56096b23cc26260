//! # Singleton Store Actor
//!
//! The single-document counterpart of [`ResourceActor`](crate::ResourceActor), used for
//! settings pages and dashboard statistics. It shares the request tracking of the
//! collection store: loads follow the "latest load wins" rule, saves replace the value,
//! and a value saved while the latest load is out wins over that load's answer.

use crate::api::SingletonApi;
use crate::client::SingletonClient;
use crate::entity::Singleton;
use crate::envelope::{ApiError, ApiResult};
use crate::error::StoreError;
use crate::message::{Response, SingletonRequest, SingletonSettled};
use crate::notify::Notifier;
use crate::state::{StoreState, Token, Tracker};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// The generic actor that mirrors one server-side document.
pub struct SingletonActor<V: Singleton> {
    receiver: mpsc::Receiver<SingletonRequest<V>>,
    settled_tx: mpsc::UnboundedSender<SingletonSettled<V>>,
    settled_rx: mpsc::UnboundedReceiver<SingletonSettled<V>>,
    state_tx: watch::Sender<StoreState<Option<V>>>,
    value: Option<V>,
    /// Saved while the latest load was out.
    saved: Option<V>,
}

impl<V: Singleton> SingletonActor<V> {
    /// Creates a new `SingletonActor` and its associated `SingletonClient`.
    pub fn new(buffer_size: usize) -> (Self, SingletonClient<V>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(StoreState::default());
        let actor = Self {
            receiver,
            settled_tx,
            settled_rx,
            state_tx,
            value: None,
            saved: None,
        };
        (actor, SingletonClient::new(sender, state_rx))
    }

    pub async fn run(mut self, api: Arc<dyn SingletonApi<V>>, notifier: Arc<dyn Notifier>) {
        let entity_type = V::LABEL;
        info!(entity_type, "Store started");

        let mut tracker = Tracker::new(notifier);
        let mut open = true;

        loop {
            tokio::select! {
                msg = self.receiver.recv(), if open => match msg {
                    Some(msg) => self.handle_request(msg, &api, &mut tracker),
                    None => open = false,
                },
                Some(done) = self.settled_rx.recv() => self.handle_settled(done, &mut tracker),
            }

            if !open && tracker.pending() == 0 {
                break;
            }
        }

        info!(entity_type, loaded = self.value.is_some(), "Shutdown");
    }

    /// Runs `call` in its own task; a panicking call settles as a network failure.
    fn spawn_call<F, S>(&self, token: Token, call: F, settle: S)
    where
        F: Future<Output = ApiResult<V>> + Send + 'static,
        S: FnOnce(ApiResult<V>) -> SingletonSettled<V> + Send + 'static,
    {
        let done = self.settled_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::spawn(call).await {
                Ok(result) => result,
                Err(e) => {
                    error!(entity_type = V::LABEL, token, error = %e, "Request task failed");
                    Err(ApiError::Network(format!("request task failed: {e}")))
                }
            };
            let _ = done.send(settle(result));
        });
    }

    fn handle_request(
        &mut self,
        msg: SingletonRequest<V>,
        api: &Arc<dyn SingletonApi<V>>,
        tracker: &mut Tracker,
    ) {
        let entity_type = V::LABEL;
        let api = api.clone();
        match msg {
            SingletonRequest::Load { respond_to } => {
                let token = tracker.begin_fetch();
                self.saved = None;
                debug!(entity_type, token, "Load");
                self.spawn_call(token, async move { api.get().await }, move |result| {
                    SingletonSettled::Loaded {
                        token,
                        result,
                        respond_to,
                    }
                });
            }
            SingletonRequest::Save { update, respond_to } => {
                let token = tracker.begin();
                debug!(entity_type, token, ?update, "Save");
                self.spawn_call(token, async move { api.update(update).await }, move |result| {
                    SingletonSettled::Saved {
                        token,
                        result,
                        respond_to,
                    }
                });
            }
            SingletonRequest::ClearError { respond_to } => {
                tracker.clear_error();
                self.reply(tracker, respond_to, Ok(()));
                return;
            }
        }
        self.publish(tracker);
    }

    fn reply<R>(&self, tracker: &Tracker, respond_to: Response<R>, outcome: Result<R, StoreError>) {
        self.publish(tracker);
        let _ = respond_to.send(outcome);
    }

    fn publish(&self, tracker: &Tracker) {
        self.state_tx
            .send_replace(tracker.snapshot(self.value.clone()));
    }

    fn handle_settled(&mut self, done: SingletonSettled<V>, tracker: &mut Tracker) {
        let entity_type = V::LABEL;
        match done {
            SingletonSettled::Loaded {
                token,
                result,
                respond_to,
            } => {
                if !tracker.fetch_is_current(token) {
                    debug!(entity_type, token, "Load superseded");
                    let err = tracker.discard();
                    self.reply(tracker, respond_to, Err(err));
                    return;
                }
                tracker.close_fetch();
                let title = format!("Failed to load {}", V::LABEL.to_lowercase());
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, V::LABEL, &title));
                match outcome {
                    Ok((loaded, _)) => {
                        let value = self.saved.take().unwrap_or(loaded);
                        self.value = Some(value.clone());
                        info!(entity_type, token, "Loaded");
                        self.reply(tracker, respond_to, Ok(value));
                    }
                    Err(e) => {
                        self.saved = None;
                        warn!(entity_type, token, error = %e, "Load failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
            SingletonSettled::Saved {
                token,
                result,
                respond_to,
            } => {
                let title = format!("Failed to save {}", V::LABEL.to_lowercase());
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, V::LABEL, &title));
                match outcome {
                    Ok((value, message)) => {
                        self.value = Some(value.clone());
                        if tracker.fetch_open() {
                            self.saved = Some(value.clone());
                        }
                        info!(entity_type, token, "Saved");
                        tracker.succeed(
                            format!("{} saved", V::LABEL),
                            message.unwrap_or_else(|| "Your changes have been saved.".to_string()),
                        );
                        self.reply(tracker, respond_to, Ok(value));
                    }
                    Err(e) => {
                        warn!(entity_type, token, error = %e, "Save failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
        }
    }
}
