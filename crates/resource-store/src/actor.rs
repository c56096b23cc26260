//! # Collection Store Actor
//!
//! This module defines the `ResourceActor`, the component that owns the in-memory mirror
//! of one server-side collection. It is the "server" half of the store: it owns the
//! state and the receiving end of the request channel.

use crate::api::ResourceApi;
use crate::client::ResourceClient;
use crate::entity::{Operation, Resource};
use crate::envelope::{ApiError, ApiResult};
use crate::error::StoreError;
use crate::message::{ResourceRequest, Response, Settled};
use crate::notify::Notifier;
use crate::state::{StoreState, Token, Tracker};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// The generic actor that mirrors a collection of entities.
///
/// # Concurrency Model
///
/// The actor processes its messages sequentially, so the collection needs no lock. API
/// calls, however, run in spawned tasks and report back through an internal channel:
/// a slow list call never blocks a create, and responses are reconciled in the order
/// they arrive, subject to the sequence-token rules in [`state`](crate::state).
///
/// Mutations reconciled while the latest fetch is out are logged as patches and
/// replayed over that fetch's list when it lands.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its `ResourceClient`.
/// 2.  **Wire**: pass the endpoint binding and the notifier into `actor.run(..)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use resource_store::{Envelope, ApiResult, Resource, ResourceActor, ResourceApi, TracingNotifier};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug)] struct Note { id: u32, text: String }
///
/// impl Resource for Note {
///     type Id = u32;
///     type Create = String;
///     type Update = String;
///     type Action = std::convert::Infallible;
///     const LABEL: &'static str = "Note";
///     const COLLECTION: &'static str = "notes";
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// struct NotesApi;
///
/// #[async_trait]
/// impl ResourceApi<Note> for NotesApi {
///     async fn list(&self) -> ApiResult<Vec<Note>> {
///         Ok(Envelope::ok(vec![Note { id: 1, text: "hello".into() }]))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run(Arc::new(NotesApi), Arc::new(TracingNotifier)));
///
///     client.fetch_all().await.unwrap();
///     assert_eq!(client.items().len(), 1);
/// }
/// ```
pub struct ResourceActor<T: Resource> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    settled_tx: mpsc::UnboundedSender<Settled<T>>,
    settled_rx: mpsc::UnboundedReceiver<Settled<T>>,
    state_tx: watch::Sender<StoreState<Vec<T>>>,
    items: Vec<T>,
    replay: Vec<Patch<T>>,
}

/// A reconciled mutation, kept until the fetch that was out when it landed is applied.
enum Patch<T: Resource> {
    Upsert(T),
    Replace(T::Id, T),
    Remove(T::Id),
}

impl<T: Resource> Patch<T> {
    fn apply(&self, items: &mut Vec<T>) {
        match self {
            // Appends, or replaces the entry with the same id so ids stay unique.
            Patch::Upsert(item) => match items.iter_mut().find(|i| i.id() == item.id()) {
                Some(slot) => *slot = item.clone(),
                None => items.push(item.clone()),
            },
            Patch::Replace(id, item) => match items.iter_mut().find(|i| i.id() == id) {
                Some(slot) => *slot = item.clone(),
                None => debug!(entity_type = T::LABEL, %id, "Not in collection"),
            },
            Patch::Remove(id) => items.retain(|i| i.id() != id),
        }
    }
}

impl<T: Resource> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client
    /// calls wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(StoreState::default());
        let actor = Self {
            receiver,
            settled_tx,
            settled_rx,
            state_tx,
            items: Vec::new(),
            replay: Vec::new(),
        };
        (actor, ResourceClient::new(sender, state_rx))
    }

    /// Runs the actor's event loop until every client is dropped and no request is
    /// still in flight.
    pub async fn run(mut self, api: Arc<dyn ResourceApi<T>>, notifier: Arc<dyn Notifier>) {
        let entity_type = T::LABEL;
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

        info!(entity_type, size = self.items.len(), "Shutdown");
    }

    /// Runs `call` in its own task and hands its result to `settle`. A call that panics
    /// settles as a network failure, so every issued token is settled.
    fn spawn_call<X, F, S>(&self, token: Token, call: F, settle: S)
    where
        X: Send + 'static,
        F: Future<Output = ApiResult<X>> + Send + 'static,
        S: FnOnce(ApiResult<X>) -> Settled<T> + Send + 'static,
    {
        let done = self.settled_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::spawn(call).await {
                Ok(result) => result,
                Err(e) => {
                    error!(entity_type = T::LABEL, token, error = %e, "Request task failed");
                    Err(ApiError::Network(format!("request task failed: {e}")))
                }
            };
            // The actor only goes away once nothing is pending.
            let _ = done.send(settle(result));
        });
    }

    fn handle_request(
        &mut self,
        msg: ResourceRequest<T>,
        api: &Arc<dyn ResourceApi<T>>,
        tracker: &mut Tracker,
    ) {
        let entity_type = T::LABEL;
        let api = api.clone();
        match msg {
            ResourceRequest::Fetch { respond_to } => {
                let token = tracker.begin_fetch();
                // The new list already includes everything reconciled so far.
                self.replay.clear();
                debug!(entity_type, token, "Fetch");
                self.spawn_call(token, async move { api.list().await }, move |result| {
                    Settled::Fetched {
                        token,
                        result,
                        respond_to,
                    }
                });
            }
            ResourceRequest::Create { params, respond_to } => {
                let token = tracker.begin();
                debug!(entity_type, token, ?params, "Create");
                self.spawn_call(token, async move { api.create(params).await }, move |result| {
                    Settled::Created {
                        token,
                        result,
                        respond_to,
                    }
                });
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => {
                let token = tracker.begin();
                debug!(entity_type, token, %id, ?update, "Update");
                let target = id.clone();
                self.spawn_call(
                    token,
                    async move { api.update(target, update).await },
                    move |result| Settled::Updated {
                        token,
                        id,
                        result,
                        respond_to,
                    },
                );
            }
            ResourceRequest::Delete { id, respond_to } => {
                let token = tracker.begin();
                debug!(entity_type, token, %id, "Delete");
                let target = id.clone();
                self.spawn_call(
                    token,
                    async move { api.delete(target).await },
                    move |result| Settled::Deleted {
                        token,
                        id,
                        result,
                        respond_to,
                    },
                );
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => {
                let token = tracker.begin();
                debug!(entity_type, token, %id, ?action, "Action");
                let (target, requested) = (id.clone(), action.clone());
                self.spawn_call(
                    token,
                    async move { api.perform(target, requested).await },
                    move |result| Settled::Acted {
                        token,
                        id,
                        action,
                        result,
                        respond_to,
                    },
                );
            }
            ResourceRequest::ClearError { respond_to } => {
                debug!(entity_type, "Clear error");
                tracker.clear_error();
                self.reply(tracker, respond_to, Ok(()));
                return;
            }
        }
        self.publish(tracker);
    }

    fn handle_settled(&mut self, done: Settled<T>, tracker: &mut Tracker) {
        let entity_type = T::LABEL;
        match done {
            Settled::Fetched {
                token,
                result,
                respond_to,
            } => {
                if !tracker.fetch_is_current(token) {
                    debug!(entity_type, token, "Fetch superseded");
                    let err = tracker.discard();
                    self.reply(tracker, respond_to, Err(err));
                    return;
                }
                tracker.close_fetch();
                let title = T::failure_title(Operation::Fetch);
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, T::COLLECTION, &title));
                match outcome {
                    Ok((items, _)) => {
                        self.items = items;
                        let replayed = self.replay.len();
                        for patch in self.replay.drain(..) {
                            patch.apply(&mut self.items);
                        }
                        info!(entity_type, token, size = self.items.len(), replayed, "Fetched");
                        self.reply(tracker, respond_to, Ok(()));
                    }
                    Err(e) => {
                        self.replay.clear();
                        warn!(entity_type, token, error = %e, "Fetch failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
            Settled::Created {
                token,
                result,
                respond_to,
            } => {
                let title = T::failure_title(Operation::Create);
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, T::LABEL, &title));
                match outcome {
                    Ok((item, message)) => {
                        self.reconcile(Patch::Upsert(item.clone()), tracker);
                        info!(entity_type, token, id = %item.id(), size = self.items.len(), "Created");
                        tracker.succeed(
                            T::success_title(Operation::Create),
                            message.unwrap_or_else(|| {
                                format!("\"{}\" has been created.", item.display_name())
                            }),
                        );
                        self.reply(tracker, respond_to, Ok(item));
                    }
                    Err(e) => {
                        warn!(entity_type, token, error = %e, "Create failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
            Settled::Updated {
                token,
                id,
                result,
                respond_to,
            } => {
                let title = T::failure_title(Operation::Update);
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, T::LABEL, &title));
                match outcome {
                    Ok((item, message)) => {
                        self.reconcile(Patch::Replace(id.clone(), item.clone()), tracker);
                        info!(entity_type, token, %id, "Updated");
                        tracker.succeed(
                            T::success_title(Operation::Update),
                            message.unwrap_or_else(|| {
                                format!("\"{}\" has been updated.", item.display_name())
                            }),
                        );
                        self.reply(tracker, respond_to, Ok(item));
                    }
                    Err(e) => {
                        warn!(entity_type, token, %id, error = %e, "Update failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
            Settled::Deleted {
                token,
                id,
                result,
                respond_to,
            } => {
                let title = T::failure_title(Operation::Delete);
                match tracker.finish(token, result, &title) {
                    Ok(env) => {
                        let name = self
                            .items
                            .iter()
                            .find(|item| item.id() == &id)
                            .map(|item| item.display_name())
                            .unwrap_or_else(|| id.to_string());
                        self.reconcile(Patch::Remove(id.clone()), tracker);
                        info!(entity_type, token, %id, size = self.items.len(), "Deleted");
                        tracker.succeed(
                            T::success_title(Operation::Delete),
                            env.message
                                .unwrap_or_else(|| format!("\"{name}\" has been deleted.")),
                        );
                        self.reply(tracker, respond_to, Ok(()));
                    }
                    Err(e) => {
                        warn!(entity_type, token, %id, error = %e, "Delete failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
            Settled::Acted {
                token,
                id,
                action,
                result,
                respond_to,
            } => {
                let title = T::failure_title(Operation::Action);
                let outcome = tracker
                    .finish(token, result, &title)
                    .and_then(|env| tracker.require(token, env, T::LABEL, &title));
                match outcome {
                    Ok((item, message)) => {
                        self.reconcile(Patch::Replace(id.clone(), item.clone()), tracker);
                        info!(entity_type, token, %id, "Action ok");
                        tracker.succeed(
                            T::action_title(&action, &item),
                            message.unwrap_or_else(|| {
                                format!("\"{}\" has been updated.", item.display_name())
                            }),
                        );
                        self.reply(tracker, respond_to, Ok(item));
                    }
                    Err(e) => {
                        warn!(entity_type, token, %id, error = %e, "Action failed");
                        self.reply(tracker, respond_to, Err(e));
                    }
                }
            }
        }
    }

    /// Applies a reconciled mutation, keeping it for replay while a fetch is out.
    fn reconcile(&mut self, patch: Patch<T>, tracker: &Tracker) {
        patch.apply(&mut self.items);
        if tracker.fetch_open() {
            self.replay.push(patch);
        }
    }

    /// Publishes the state before answering, so a caller that awaited the outcome
    /// always reads the state it produced.
    fn reply<R>(&self, tracker: &Tracker, respond_to: Response<R>, outcome: Result<R, StoreError>) {
        self.publish(tracker);
        let _ = respond_to.send(outcome);
    }

    fn publish(&self, tracker: &Tracker) {
        self.state_tx.send_replace(tracker.snapshot(self.items.clone()));
    }
}
