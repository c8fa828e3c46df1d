use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use payloads::ClientError;
use serde::Serialize;

use crate::cache::ResponseCache;
use crate::error::FetchError;
use crate::lifecycle::LifecycleGuard;
use crate::platform;
use crate::retry::RetryPolicy;
use crate::state::{RequestState, StateHandle};
use crate::time::TimeSource;

/// Per-instance options for a [`Fetcher`].
pub struct FetchOptions<T> {
    /// Fetch as soon as the owning component mounts (see
    /// [`Fetcher::mount`]).
    pub immediate: bool,
    /// Value of `data` before the first fetch and after [`Fetcher::reset`].
    pub initial_data: Option<T>,
    pub retry: RetryPolicy,
    /// Serve a recent successful response instead of calling again.
    pub cache: bool,
    /// Explicit cache key. Without one the key is derived by serializing
    /// the call arguments.
    pub cache_key: Option<String>,
    pub cache_ttl: Duration,
    /// Invoked with every successfully produced value, cached or live.
    pub on_success: Option<Rc<dyn Fn(&T)>>,
    /// Invoked with every terminal failure (after retries are exhausted).
    pub on_error: Option<Rc<dyn Fn(&FetchError)>>,
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self {
            immediate: false,
            initial_data: None,
            retry: RetryPolicy::default(),
            cache: false,
            cache_key: None,
            cache_ttl: Duration::from_secs(300),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T: Clone> Clone for FetchOptions<T> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            initial_data: self.initial_data.clone(),
            retry: self.retry,
            cache: self.cache,
            cache_key: self.cache_key.clone(),
            cache_ttl: self.cache_ttl,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

type Operation<A, T> =
    Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, ClientError>>>;

/// One bound API operation plus the state, cache, and lifecycle that go
/// with it. The per-component unit of data fetching.
///
/// Cloning produces another handle to the same instance (shared state,
/// cache, and lifecycle), which is how a spawned `execute` and the owning
/// component both hold it.
pub struct Fetcher<A, T> {
    op: Operation<A, T>,
    options: FetchOptions<T>,
    state: StateHandle<T>,
    cache: Rc<RefCell<ResponseCache<T>>>,
    guard: LifecycleGuard,
}

impl<A, T: Clone> Clone for Fetcher<A, T> {
    fn clone(&self) -> Self {
        Self {
            op: self.op.clone(),
            options: self.options.clone(),
            state: self.state.clone(),
            cache: self.cache.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<A, T> Fetcher<A, T>
where
    A: Serialize + Clone + 'static,
    T: Clone + 'static,
{
    /// Bind `op` with `options`. The time source only feeds cache TTL
    /// decisions and is injected so tests can control it.
    pub fn new<F, Fut>(
        op: F,
        options: FetchOptions<T>,
        time_source: TimeSource,
    ) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, ClientError>> + 'static,
    {
        let state = StateHandle::new(RequestState::with_initial(
            options.initial_data.clone(),
        ));
        Self {
            op: Rc::new(move |args| Box::pin(op(args))),
            options,
            state,
            cache: Rc::new(RefCell::new(ResponseCache::new(time_source))),
            guard: LifecycleGuard::default(),
        }
    }

    /// Run one logical call: cache lookup, live attempt, bounded retries.
    ///
    /// The outcome is surfaced three ways at once: stored in the request
    /// state, forwarded to the `on_success`/`on_error` callback, and
    /// returned, so call sites may `?` or ignore the result and render
    /// from state. A call superseded by a newer one (or by teardown)
    /// still resolves for its caller but leaves state untouched.
    pub async fn execute(&self, args: A) -> Result<T, FetchError> {
        let generation = self.guard.begin();
        // Derived once per call; the lookup and the store share it.
        let cache_key = if self.options.cache {
            self.cache_key(&args)
        } else {
            None
        };

        if let Some(key) = &cache_key
            && let Some(value) =
                self.cache.borrow_mut().lookup(key, self.options.cache_ttl)
        {
            if self.guard.is_current(generation) {
                let cached = value.clone();
                self.state.update(move |state| {
                    state.data = Some(cached);
                    state.error = None;
                    state.loading = false;
                });
                if let Some(on_success) = &self.options.on_success {
                    on_success(&value);
                }
            }
            return Ok(value);
        }

        if self.guard.is_current(generation) {
            self.state.update(|state| {
                state.loading = true;
                state.error = None;
            });
        }

        let mut attempts_used = 0;
        loop {
            match (self.op)(args.clone()).await {
                Ok(value) => {
                    if self.guard.is_current(generation) {
                        if let Some(key) = &cache_key {
                            self.cache
                                .borrow_mut()
                                .store(key.clone(), value.clone());
                        }
                        let fetched = value.clone();
                        self.state.update(move |state| {
                            state.data = Some(fetched);
                            state.error = None;
                            state.loading = false;
                        });
                        if let Some(on_success) = &self.options.on_success {
                            on_success(&value);
                        }
                    } else {
                        tracing::debug!(
                            "discarding result of superseded request"
                        );
                    }
                    return Ok(value);
                }
                Err(source) => {
                    let error = FetchError::from(source);
                    if !self.guard.is_current(generation) {
                        tracing::debug!(
                            "discarding failure of superseded request"
                        );
                        return Err(error);
                    }
                    if self.options.retry.should_retry(&error, attempts_used)
                    {
                        attempts_used += 1;
                        tracing::warn!(
                            attempt = attempts_used,
                            delay_ms =
                                self.options.retry.delay.as_millis() as u64,
                            %error,
                            "request failed, retrying"
                        );
                        platform::sleep(self.options.retry.delay).await;
                        if !self.guard.is_current(generation) {
                            // Cancelled during the retry wait.
                            return Err(error);
                        }
                        continue;
                    }
                    tracing::debug!(%error, "request failed terminally");
                    let stored = error.clone();
                    self.state.update(move |state| {
                        state.error = Some(stored);
                        state.loading = false;
                    });
                    if let Some(on_error) = &self.options.on_error {
                        on_error(&error);
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Spawn the initial `execute` when the `immediate` option is set.
    /// Component hooks call this from their mount effect; without
    /// `immediate` it is a no-op.
    pub fn mount(&self, args: A) {
        if !self.options.immediate {
            return;
        }
        let fetcher = self.clone();
        platform::spawn_local(async move {
            let _ = fetcher.execute(args).await;
        });
    }

    /// Current `{ data, loading, error }`.
    pub fn snapshot(&self) -> RequestState<T> {
        self.state.snapshot()
    }

    /// A shared view of the state, e.g. for a component to render from.
    pub fn state_handle(&self) -> StateHandle<T> {
        self.state.clone()
    }

    /// Back to `data = initial_data, error = None, loading = false`.
    /// Supersedes any in-flight call so it cannot clobber the reset.
    /// Idempotent.
    pub fn reset(&self) {
        self.guard.cancel();
        if !self.guard.is_mounted() {
            return;
        }
        let initial = self.options.initial_data.clone();
        self.state.update(move |state| {
            state.data = initial;
            state.error = None;
            state.loading = false;
        });
    }

    /// Supersede the in-flight call; its late result is ignored. The
    /// underlying transport is not interrupted.
    pub fn cancel(&self) {
        self.guard.cancel();
        if self.guard.is_mounted() {
            self.state.update(|state| state.loading = false);
        }
    }

    /// Drop all cached entries of this instance. Other instances are
    /// unaffected; the cache is not shared.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Tear down: cancel and turn every later state write into a no-op.
    pub fn unmount(&self) {
        self.guard.unmount();
    }

    fn cache_key(&self, args: &A) -> Option<String> {
        if let Some(key) = &self.options.cache_key {
            return Some(key.clone());
        }
        match serde_json::to_string(args) {
            Ok(key) => Some(key),
            Err(error) => {
                tracing::warn!(
                    %error,
                    "call arguments not serializable, skipping cache"
                );
                None
            }
        }
    }
}
