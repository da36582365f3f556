//! A cookie store hosted on its own task.
//!
//! [`CookieStoreService`] owns a [`CookieMonster`] inside a tokio task and
//! answers requests through completion channels, the way a browser engine
//! answers its cookie-store calls on another thread. Requests are served
//! one at a time in arrival order. Once the task stops, every request
//! resolves with [`NetError::StoreUnavailable`].

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::{CanonicalCookie, CookieKey};
use crate::cookies::monster::CookieMonster;
use crate::cookies::store::{Applying, CookieStore, Listing};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Default number of requests that may wait for the store task.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

enum Request {
    GetAll {
        reply: oneshot::Sender<Vec<CanonicalCookie>>,
    },
    Set {
        cookie: CanonicalCookie,
        reply: oneshot::Sender<()>,
    },
    Delete {
        key: CookieKey,
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Handle to a cookie store running on a background task.
#[derive(Clone)]
pub struct CookieStoreService {
    sender: mpsc::Sender<Request>,
}

impl CookieStoreService {
    /// Spawn the store task. Must be called from within a tokio runtime.
    ///
    /// The task ends after [`shutdown`](Self::shutdown) or once every
    /// handle has been dropped.
    pub fn spawn(monster: CookieMonster, queue_depth: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(queue_depth.max(1));
        let task = tokio::spawn(Self::run(monster, receiver));
        (Self { sender }, task)
    }

    async fn run(monster: CookieMonster, mut receiver: mpsc::Receiver<Request>) {
        tracing::debug!("cookie store task started");
        while let Some(request) = receiver.recv().await {
            match request {
                Request::GetAll { reply } => {
                    let _ = reply.send(monster.get_all_cookies());
                }
                Request::Set { cookie, reply } => {
                    monster.set_canonical_cookie(cookie);
                    let _ = reply.send(());
                }
                Request::Delete { key, reply } => {
                    monster.delete_canonical_cookie(&key);
                    let _ = reply.send(());
                }
                Request::Shutdown => break,
            }
        }
        // Dropping the receiver fails queued requests with a closed reply channel
        tracing::debug!("cookie store task stopped");
    }

    /// Ask the store task to stop. Requests already queued behind the
    /// shutdown resolve with `StoreUnavailable`.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(Request::Shutdown).await;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn submit<T: Send + 'static>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> impl std::future::Future<Output = Result<T, NetError>> + Send + 'static {
        let sender = self.sender.clone();
        let (reply, response) = oneshot::channel();
        let request = make(reply);
        async move {
            sender
                .send(request)
                .await
                .map_err(|_| NetError::store_unavailable("cookie store task has stopped"))?;
            response
                .await
                .map_err(|_| NetError::store_unavailable("cookie store dropped the request"))
        }
    }
}

impl CookieStore for CookieStoreService {
    fn get_all_cookies(&self) -> Listing {
        Box::pin(self.submit(|reply| Request::GetAll { reply }))
    }

    fn set_cookie(&self, cookie: CanonicalCookie) -> Applying {
        Box::pin(self.submit(|reply| Request::Set { cookie, reply }))
    }

    fn delete_cookie(&self, key: CookieKey) -> Applying {
        Box::pin(self.submit(|reply| Request::Delete { key, reply }))
    }
}
