//! Deferred delivery of tracking calls to a backend that may not be loaded yet.
//!
//! Calls issued while the backend is absent are appended to a single FIFO queue. One shared
//! poller checks readiness at a fixed interval and drains the queue in issuance order as soon as
//! the provider resolves a backend. Calls issued while the backend is present are delivered
//! synchronously, after anything still queued.

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::channel::oneshot;

use crate::client::backend::{Backend, BackendProvider, EventData};
use crate::platform::runtime::{sleep, spawn_detached};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Readiness polling configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    /// Maximum number of readiness checks before the poller gives up. `None` polls for as long as
    /// calls are pending.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallKind {
    Track { event_name: Option<String> },
    Identify,
}

/// A single queued invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCall {
    kind: CallKind,
    payload: Option<EventData>,
    enqueued_at: u64,
}

impl PendingCall {
    pub fn kind(&self) -> &CallKind {
        &self.kind
    }

    pub fn payload(&self) -> Option<&EventData> {
        self.payload.as_ref()
    }

    pub fn enqueued_at(&self) -> u64 {
        self.enqueued_at
    }

    fn deliver(&self, backend: &dyn Backend) {
        match &self.kind {
            CallKind::Track { event_name } => backend.track(event_name.as_deref(), self.payload()),
            CallKind::Identify => match self.payload() {
                Some(data) => backend.identify(data),
                None => backend.identify(&EventData::new()),
            },
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    provider: Arc<dyn BackendProvider>,
    settings: PollSettings,
    state: Mutex<DispatchState>,
}

#[derive(Default)]
struct DispatchState {
    queue: VecDeque<PendingCall>,
    next_sequence: u64,
    polling: bool,
    /// Set while some stack is handing queued calls to the backend, so a nested or concurrent
    /// dispatch only appends and leaves delivery to that stack.
    draining: bool,
    waiters: Vec<oneshot::Sender<bool>>,
}

/// Clears `draining` if delivery unwinds out of a backend call.
struct DrainGuard<'a> {
    state: &'a Mutex<DispatchState>,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.draining = false;
        }
    }
}

impl DispatcherInner {
    /// Hands queued calls to `backend` one at a time, popping each under the lock and delivering
    /// it outside. A backend panic loses only the call being delivered; the rest stay queued.
    fn drain_into(&self, backend: &dyn Backend) {
        {
            let mut state = self.state.lock().unwrap();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let mut guard = DrainGuard {
            state: &self.state,
            armed: true,
        };

        loop {
            let next = {
                let mut state = self.state.lock().unwrap();
                match state.queue.pop_front() {
                    Some(call) => call,
                    None => {
                        state.draining = false;
                        guard.armed = false;
                        let waiters = mem::take(&mut state.waiters);
                        drop(state);
                        notify(waiters, true);
                        return;
                    }
                }
            };
            next.deliver(backend);
        }
    }
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn BackendProvider>, settings: PollSettings) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                provider,
                settings,
                state: Mutex::new(DispatchState::default()),
            }),
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.inner.settings
    }

    /// Forwards the call now if the backend is present, otherwise queues it until it is. Either
    /// way the call goes behind anything queued earlier.
    pub fn dispatch(&self, kind: CallKind, payload: Option<EventData>) {
        let backend = self.inner.provider.resolve();
        let mut state = self.inner.state.lock().unwrap();
        let call = PendingCall {
            kind,
            payload,
            enqueued_at: state.next_sequence,
        };
        state.next_sequence += 1;

        match backend {
            Some(backend) => {
                state.queue.push_back(call);
                drop(state);
                self.inner.drain_into(backend.as_ref());
            }
            None => {
                log::debug!(
                    "analytics backend not available yet; deferring call #{}",
                    call.enqueued_at
                );
                state.queue.push_back(call);
                let start_poller = !state.polling;
                state.polling = true;
                drop(state);
                if start_poller {
                    self.start_polling();
                }
            }
        }
    }

    /// Delivers queued calls if the backend is present. Returns whether it was.
    pub fn flush(&self) -> bool {
        let Some(backend) = self.inner.provider.resolve() else {
            return false;
        };
        self.inner.drain_into(backend.as_ref());
        true
    }

    /// Resolves to `true` once the backend is present and every queued call has been delivered,
    /// or to `false` if a bounded poller gave up first.
    pub async fn ready(&self) -> bool {
        if self.flush() && self.pending_calls() == 0 {
            return true;
        }

        let (sender, receiver) = oneshot::channel();
        let start_poller = {
            let mut state = self.inner.state.lock().unwrap();
            state.waiters.push(sender);
            let start = !state.polling;
            state.polling = true;
            start
        };
        if start_poller {
            self.start_polling();
        }

        receiver.await.unwrap_or(false)
    }

    pub fn pending_calls(&self) -> usize {
        self.inner.state.lock().unwrap().queue.len()
    }

    fn start_polling(&self) {
        let inner = Arc::clone(&self.inner);
        spawn_detached(async move {
            poll_until_ready(inner).await;
        });
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("settings", &self.inner.settings)
            .field("pending_calls", &self.pending_calls())
            .finish()
    }
}

async fn poll_until_ready(inner: Arc<DispatcherInner>) {
    let mut attempts: u32 = 0;
    loop {
        sleep(inner.settings.poll_interval).await;
        attempts = attempts.saturating_add(1);

        let backend = inner.provider.resolve();
        let mut state = inner.state.lock().unwrap();
        if state.queue.is_empty() && state.waiters.is_empty() {
            state.polling = false;
            return;
        }

        if let Some(backend) = backend {
            // Cleared first: if delivery panics the next deferred call starts a fresh poller.
            state.polling = false;
            drop(state);
            inner.drain_into(backend.as_ref());
            return;
        }

        if let Some(limit) = inner.settings.max_attempts {
            if attempts >= limit {
                state.polling = false;
                let pending = state.queue.len();
                let waiters = mem::take(&mut state.waiters);
                drop(state);
                log::warn!(
                    "analytics backend still unavailable after {attempts} checks; keeping {pending} call(s) queued"
                );
                notify(waiters, false);
                return;
            }
        }
    }
}

fn notify(waiters: Vec<oneshot::Sender<bool>>, ready: bool) {
    for waiter in waiters {
        let _ = waiter.send(ready);
    }
}
