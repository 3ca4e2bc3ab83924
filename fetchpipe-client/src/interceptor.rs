//! Interceptors for the request pipeline.
//!
//! An interceptor is a pair of asynchronous handlers attached to one stage
//! of the pipeline:
//! - the *fulfilled* handler receives the value flowing through the stage
//!   and returns the (possibly modified) value, or an error;
//! - the *rejected* handler receives an error raised by an earlier stage
//!   and may recover by returning a value, or fail again.
//!
//! Request interceptors see the merged [`RequestConfig`]; response
//! interceptors see the [`ResponseEnvelope`].
//!
//! # Example
//!
//! ```ignore
//! use fetchpipe_client::{ClientError, HttpClient, Interceptor};
//!
//! let client = HttpClient::builder().base_url("http://localhost:3000").build()?;
//!
//! // Stamp every request with an auth header
//! let handle = client.interceptors().request.use_interceptor(Interceptor::new(
//!     |config: RequestConfig| async move { config.try_header("authorization", "Bearer token123") },
//! ));
//!
//! // Turn transport failures into a fallback response
//! client.interceptors().response.use_interceptor(
//!     Interceptor::rejected(|err: ClientError| async move { Err(err) }),
//! );
//!
//! client.interceptors().request.eject(handle);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::RwLock;

use crate::ClientError;
use crate::config::RequestConfig;
use crate::response::ResponseEnvelope;

type FulfilledFn<V> = dyn Fn(V) -> BoxFuture<'static, Result<V, ClientError>> + Send + Sync;
type RejectedFn<V> = dyn Fn(ClientError) -> BoxFuture<'static, Result<V, ClientError>> + Send + Sync;

/// A fulfilled/rejected handler pair.
///
/// Either half may be missing: a missing fulfilled handler passes the value
/// through, a missing rejected handler passes the error through.
pub struct Interceptor<V> {
    fulfilled: Option<Arc<FulfilledFn<V>>>,
    rejected: Option<Arc<RejectedFn<V>>>,
}

impl<V: Send + 'static> Interceptor<V> {
    /// Create an interceptor with only a fulfilled handler.
    pub fn new<F, Fut>(fulfilled: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        Self {
            fulfilled: Some(Arc::new(move |value: V| fulfilled(value).boxed())),
            rejected: None,
        }
    }

    /// Create an interceptor with only a rejected handler.
    pub fn rejected<F, Fut>(rejected: F) -> Self
    where
        F: Fn(ClientError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        Self {
            fulfilled: None,
            rejected: None,
        }
        .on_rejected(rejected)
    }

    /// Attach (or replace) the rejected handler.
    pub fn on_rejected<F, Fut>(mut self, rejected: F) -> Self
    where
        F: Fn(ClientError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        self.rejected = Some(Arc::new(move |err: ClientError| rejected(err).boxed()));
        self
    }

    /// Feed the outcome of the previous stage through this interceptor.
    pub async fn run(&self, state: Result<V, ClientError>) -> Result<V, ClientError> {
        match state {
            Ok(value) => match &self.fulfilled {
                Some(fulfilled) => fulfilled(value).await,
                None => Ok(value),
            },
            Err(err) => match &self.rejected {
                Some(rejected) => rejected(err).await,
                None => Err(err),
            },
        }
    }
}

impl<V> Clone for Interceptor<V> {
    fn clone(&self) -> Self {
        Self {
            fulfilled: self.fulfilled.clone(),
            rejected: self.rejected.clone(),
        }
    }
}

impl<V> fmt::Debug for Interceptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("fulfilled", &self.fulfilled.is_some())
            .field("rejected", &self.rejected.is_some())
            .finish()
    }
}

/// Identifies a registered interceptor for later removal.
///
/// Handles are slot indices. They are never reused, so a handle stays a
/// valid argument to [`InterceptorManager::eject`] after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterceptorHandle(usize);

impl InterceptorHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for InterceptorHandle {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// An ordered, append-only registry of interceptors for one stage.
///
/// Removal leaves a tombstone in the slot. Registration and removal take
/// `&self` and are safe to call from any task.
pub struct InterceptorManager<V> {
    slots: RwLock<Vec<Option<Interceptor<V>>>>,
}

impl<V> InterceptorManager<V> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Register an interceptor and return its handle.
    pub fn use_interceptor(&self, interceptor: Interceptor<V>) -> InterceptorHandle {
        let mut slots = self.slots.write();
        slots.push(Some(interceptor));
        InterceptorHandle(slots.len() - 1)
    }

    /// Remove the interceptor at `handle`.
    ///
    /// Ejecting an already removed or unknown handle does nothing.
    pub fn eject(&self, handle: InterceptorHandle) {
        if let Some(slot) = self.slots.write().get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Visit every live interceptor in registration order.
    ///
    /// The visit runs over a snapshot, so `visit` may register or eject
    /// without deadlocking; such changes are not seen by this traversal.
    pub fn for_each(&self, mut visit: impl FnMut(&Interceptor<V>)) {
        for interceptor in self.snapshot() {
            visit(&interceptor);
        }
    }

    /// Clone the live interceptors, in registration order.
    pub fn snapshot(&self) -> Vec<Interceptor<V>> {
        self.slots.read().iter().flatten().cloned().collect()
    }

    /// Number of live interceptors.
    pub fn len(&self) -> usize {
        self.slots.read().iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for InterceptorManager<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for InterceptorManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.read();
        f.debug_struct("InterceptorManager")
            .field("slots", &slots.len())
            .field("live", &slots.iter().filter(|slot| slot.is_some()).count())
            .finish()
    }
}

/// The two interceptor registries of a client.
#[derive(Debug, Default)]
pub struct Interceptors {
    /// Run in registration order before dispatch.
    pub request: InterceptorManager<RequestConfig>,
    /// Run in registration order after dispatch.
    pub response: InterceptorManager<ResponseEnvelope>,
}
