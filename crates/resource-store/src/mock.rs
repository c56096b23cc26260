//! # Mock Framework & Testing Guide
//!
//! [`MockApi<T>`] implements [`ResourceApi<T>`] entirely in memory from a queue of scripted
//! expectations; [`MockSingletonApi<V>`] does the same for singletons. [`RecordingNotifier`]
//! keeps every notification for later assertions. Together they let you run a real store
//! actor without any HTTP.
//!
//! ## When to use Mocks vs a REST binding
//!
//! | Feature | MockApi | REST binding + wiremock |
//! |---------|---------|-------------------------|
//! | **Speed** | Instant (in-memory) | Fast (local HTTP) |
//! | **Ordering control** | Gates decide when each response resolves | None |
//! | **Use Case** | Store and screen logic | The binding's paths, bodies and decoding |
//! | **Error Injection** | `return_declined`, `return_err` | Response templates |
//!
//! ## Example
//!
//! ```rust
//! use resource_store::mock::{MockApi, RecordingNotifier};
//! use resource_store::{Resource, ResourceActor, Severity};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Tag { id: u32, name: String }
//! impl Resource for Tag {
//!     type Id = u32; type Create = String; type Update = String;
//!     type Action = std::convert::Infallible;
//!     const LABEL: &'static str = "Tag";
//!     const COLLECTION: &'static str = "tags";
//!     fn id(&self) -> &u32 { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = MockApi::<Tag>::new();
//!     api.expect_list().return_declined("database offline");
//!
//!     let notifier = RecordingNotifier::new();
//!     let (actor, client) = ResourceActor::new(10);
//!     tokio::spawn(actor.run(Arc::new(api.clone()), Arc::new(notifier.clone())));
//!
//!     assert!(client.fetch_all().await.is_err());
//!     assert_eq!(client.error().as_deref(), Some("database offline"));
//!     assert_eq!(notifier.count(Severity::Error), 1);
//!     api.verify();
//! }
//! ```
//!
//! ## Controlling resolution order
//!
//! A response can be held back until a [`Gate`] opens. Combined with
//! [`MockApi::wait_for_calls`] this makes races deterministic: issue the first request,
//! wait until the mock has seen it, issue the second, then open the gates in the order
//! the test wants the responses to land.

use crate::api::{ResourceApi, SingletonApi};
use crate::entity::{Resource, Singleton};
use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::notify::{Notification, Notifier, Severity};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

// =============================================================================
// GATES
// =============================================================================

/// Opens a held response.
pub struct Gate(oneshot::Sender<()>);

/// The held side of a [`Gate`].
pub struct Latch(oneshot::Receiver<()>);

/// Creates a connected gate/latch pair.
pub fn gate() -> (Gate, Latch) {
    let (tx, rx) = oneshot::channel();
    (Gate(tx), Latch(rx))
}

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

impl Latch {
    async fn wait(self) {
        // A dropped gate releases the response as well.
        let _ = self.0.await;
    }
}

struct Scripted<X> {
    response: ApiResult<X>,
    latch: Option<Latch>,
}

impl<X> Scripted<X> {
    async fn resolve(self) -> ApiResult<X> {
        if let Some(latch) = self.latch {
            latch.wait().await;
        }
        self.response
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call on the mock API.
enum Expectation<T: Resource> {
    List(Scripted<Vec<T>>),
    Create(Scripted<T>),
    Update(T::Id, Scripted<T>),
    Delete(T::Id, Scripted<()>),
    Action(T::Id, Scripted<T>),
}

impl<T: Resource> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::List(_) => "list",
            Expectation::Create(_) => "create",
            Expectation::Update(..) => "update",
            Expectation::Delete(..) => "delete",
            Expectation::Action(..) => "action",
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: Resource, X> {
    queue: Arc<Mutex<VecDeque<Expectation<T>>>>,
    wrap: fn(Scripted<X>) -> Expectation<T>,
    latch: Option<Latch>,
}

impl<T: Resource, X> ExpectationBuilder<T, X> {
    /// Holds the response until the gate paired with `latch` opens.
    pub fn held_by(mut self, latch: Latch) -> Self {
        self.latch = Some(latch);
        self
    }

    pub fn return_envelope(self, envelope: Envelope<X>) {
        self.push(Ok(envelope));
    }

    pub fn return_ok(self, data: X) {
        self.push(Ok(Envelope::ok(data)));
    }

    /// The server answers `success: false` with `message`.
    pub fn return_declined(self, message: &str) {
        self.push(Ok(Envelope::declined(message)));
    }

    /// The call fails without an envelope.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: ApiResult<X>) {
        let scripted = Scripted {
            response,
            latch: self.latch,
        };
        self.queue.lock().unwrap().push_back((self.wrap)(scripted));
    }
}

/// A scripted, in-memory `ResourceApi`.
///
/// Clones share the same expectation queue, so a test keeps one handle for scripting
/// and verification while the store owns another.
pub struct MockApi<T: Resource> {
    queue: Arc<Mutex<VecDeque<Expectation<T>>>>,
    calls: Arc<AtomicUsize>,
}

impl<T: Resource> Clone for MockApi<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<T: Resource> Default for MockApi<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockApi<T> {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn builder<X>(&self, wrap: fn(Scripted<X>) -> Expectation<T>) -> ExpectationBuilder<T, X> {
        ExpectationBuilder {
            queue: self.queue.clone(),
            wrap,
            latch: None,
        }
    }

    pub fn expect_list(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Create)
    }

    /// The id is checked against the call's id.
    pub fn expect_update(&self, id: T::Id) -> IdExpectationBuilder<T, T> {
        IdExpectationBuilder::new(self.queue.clone(), id, Expectation::Update)
    }

    pub fn expect_delete(&self, id: T::Id) -> IdExpectationBuilder<T, ()> {
        IdExpectationBuilder::new(self.queue.clone(), id, Expectation::Delete)
    }

    pub fn expect_action(&self, id: T::Id) -> IdExpectationBuilder<T, T> {
        IdExpectationBuilder::new(self.queue.clone(), id, Expectation::Action)
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Waits until at least `n` calls were received. Panics after one second.
    pub async fn wait_for_calls(&self, n: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(1), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await;
        if waited.is_err() {
            panic!("expected {n} calls, saw {}", self.calls());
        }
    }

    /// Panics if scripted expectations are left over.
    pub fn verify(&self) {
        let queue = self.queue.lock().unwrap();
        if !queue.is_empty() {
            let left: Vec<_> = queue.iter().map(Expectation::name).collect();
            panic!("Not all expectations were met. Remaining: {left:?}");
        }
    }

    fn next(&self, call: &str) -> Expectation<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.queue.lock().unwrap().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {call} call: no expectation left"),
        }
    }
}

/// Builder for expectations that are tied to an id.
pub struct IdExpectationBuilder<T: Resource, X> {
    queue: Arc<Mutex<VecDeque<Expectation<T>>>>,
    id: T::Id,
    wrap: fn(T::Id, Scripted<X>) -> Expectation<T>,
    latch: Option<Latch>,
}

impl<T: Resource, X> IdExpectationBuilder<T, X> {
    fn new(
        queue: Arc<Mutex<VecDeque<Expectation<T>>>>,
        id: T::Id,
        wrap: fn(T::Id, Scripted<X>) -> Expectation<T>,
    ) -> Self {
        Self {
            queue,
            id,
            wrap,
            latch: None,
        }
    }

    pub fn held_by(mut self, latch: Latch) -> Self {
        self.latch = Some(latch);
        self
    }

    pub fn return_ok(self, data: X) {
        self.push(Ok(Envelope::ok(data)));
    }

    pub fn return_envelope(self, envelope: Envelope<X>) {
        self.push(Ok(envelope));
    }

    pub fn return_declined(self, message: &str) {
        self.push(Ok(Envelope::declined(message)));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: ApiResult<X>) {
        let scripted = Scripted {
            response,
            latch: self.latch,
        };
        self.queue
            .lock()
            .unwrap()
            .push_back((self.wrap)(self.id, scripted));
    }
}

fn check_id<I: PartialEq + std::fmt::Debug>(call: &str, expected: &I, actual: &I) {
    if expected != actual {
        panic!("{call} called with id {actual:?}, expected {expected:?}");
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for MockApi<T> {
    async fn list(&self) -> ApiResult<Vec<T>> {
        match self.next("list") {
            Expectation::List(s) => s.resolve().await,
            other => panic!("Unexpected list call, expected {}", other.name()),
        }
    }

    async fn create(&self, _params: T::Create) -> ApiResult<T> {
        match self.next("create") {
            Expectation::Create(s) => s.resolve().await,
            other => panic!("Unexpected create call, expected {}", other.name()),
        }
    }

    async fn update(&self, id: T::Id, _update: T::Update) -> ApiResult<T> {
        match self.next("update") {
            Expectation::Update(expected, s) => {
                check_id("update", &expected, &id);
                s.resolve().await
            }
            other => panic!("Unexpected update call, expected {}", other.name()),
        }
    }

    async fn delete(&self, id: T::Id) -> ApiResult<()> {
        match self.next("delete") {
            Expectation::Delete(expected, s) => {
                check_id("delete", &expected, &id);
                s.resolve().await
            }
            other => panic!("Unexpected delete call, expected {}", other.name()),
        }
    }

    async fn perform(&self, id: T::Id, _action: T::Action) -> ApiResult<T> {
        match self.next("action") {
            Expectation::Action(expected, s) => {
                check_id("action", &expected, &id);
                s.resolve().await
            }
            other => panic!("Unexpected action call, expected {}", other.name()),
        }
    }
}

// =============================================================================
// SINGLETONS
// =============================================================================

enum SingletonExpectation<V> {
    Get(Scripted<V>),
    Update(Scripted<V>),
}

/// A scripted, in-memory `SingletonApi`.
pub struct MockSingletonApi<V: Singleton> {
    queue: Arc<Mutex<VecDeque<SingletonExpectation<V>>>>,
    calls: Arc<AtomicUsize>,
}

impl<V: Singleton> Clone for MockSingletonApi<V> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<V: Singleton> Default for MockSingletonApi<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for singleton expectations.
pub struct SingletonExpectationBuilder<V> {
    queue: Arc<Mutex<VecDeque<SingletonExpectation<V>>>>,
    wrap: fn(Scripted<V>) -> SingletonExpectation<V>,
    latch: Option<Latch>,
}

impl<V> SingletonExpectationBuilder<V> {
    pub fn held_by(mut self, latch: Latch) -> Self {
        self.latch = Some(latch);
        self
    }

    pub fn return_ok(self, value: V) {
        self.push(Ok(Envelope::ok(value)));
    }

    pub fn return_declined(self, message: &str) {
        self.push(Ok(Envelope::declined(message)));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: ApiResult<V>) {
        let scripted = Scripted {
            response,
            latch: self.latch,
        };
        self.queue.lock().unwrap().push_back((self.wrap)(scripted));
    }
}

impl<V: Singleton> MockSingletonApi<V> {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn expect_get(&self) -> SingletonExpectationBuilder<V> {
        SingletonExpectationBuilder {
            queue: self.queue.clone(),
            wrap: SingletonExpectation::Get,
            latch: None,
        }
    }

    pub fn expect_update(&self) -> SingletonExpectationBuilder<V> {
        SingletonExpectationBuilder {
            queue: self.queue.clone(),
            wrap: SingletonExpectation::Update,
            latch: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(1), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await;
        if waited.is_err() {
            panic!("expected {n} calls, saw {}", self.calls());
        }
    }

    pub fn verify(&self) {
        let left = self.queue.lock().unwrap().len();
        if left > 0 {
            panic!("Not all expectations were met. {left} remaining");
        }
    }

    fn next(&self, call: &str) -> SingletonExpectation<V> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.queue.lock().unwrap().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {call} call: no expectation left"),
        }
    }
}

#[async_trait]
impl<V: Singleton> SingletonApi<V> for MockSingletonApi<V> {
    async fn get(&self) -> ApiResult<V> {
        match self.next("get") {
            SingletonExpectation::Get(s) => s.resolve().await,
            SingletonExpectation::Update(_) => panic!("Unexpected get call, expected update"),
        }
    }

    async fn update(&self, _update: V::Update) -> ApiResult<V> {
        match self.next("update") {
            SingletonExpectation::Update(s) => s.resolve().await,
            SingletonExpectation::Get(_) => panic!("Unexpected update call, expected get"),
        }
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// A notifier that keeps everything it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.received.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
