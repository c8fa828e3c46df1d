use std::cell::RefCell;
use std::rc::Rc;

use crate::error::FetchError;

/// Loading/error state owned by one [`crate::Fetcher`] instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<T> RequestState<T> {
    pub fn with_initial(initial: Option<T>) -> Self {
        Self {
            data: initial,
            loading: false,
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none() && !self.loading
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::with_initial(None)
    }
}

/// Shared view of a fetcher's [`RequestState`].
///
/// Cheap to clone; all clones see the same state. Mutation happens only
/// through the owning fetcher on the single event-loop thread.
#[derive(Debug)]
pub struct StateHandle<T> {
    inner: Rc<RefCell<RequestState<T>>>,
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> StateHandle<T> {
    pub(crate) fn new(state: RequestState<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut RequestState<T>)) {
        f(&mut self.inner.borrow_mut());
    }

    pub fn loading(&self) -> bool {
        self.inner.borrow().loading
    }
}

impl<T: Clone> StateHandle<T> {
    pub fn snapshot(&self) -> RequestState<T> {
        self.inner.borrow().clone()
    }
}
