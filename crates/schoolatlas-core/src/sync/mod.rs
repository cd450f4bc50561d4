//! Stale-while-revalidate synchronization between the local store and the
//! remote catalog.
//!
//! [`network_bound`] turns a [`BoundResource`] into a lazy stream of
//! [`Resource`] states:
//!
//! 1. `Loading(None)`
//! 2. `Loading(Some(local))` with whatever the store currently holds
//! 3. `Success(fresh)` after the remote data has been written through, or
//!    `Error { stale: Some(local) }` if the fetch or the write failed
//!
//! A failing local query ends the stream with `Error { stale: None }`.
//! Dropping the stream cancels any in-flight work at its next await.

use std::fmt;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use tracing::{debug, warn};

use crate::ports::{RemoteError, RepositoryError};

/// Message used when an error renders as an empty string.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// One state of a synchronized resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    /// Work is in progress; carries cached data once the local query ran.
    Loading(Option<T>),
    /// Fresh data, written through to the local store.
    Success(T),
    /// The refresh failed; `stale` keeps the last local snapshot, if any.
    Error { message: String, stale: Option<T> },
}

impl<T> Resource<T> {
    /// Best data available in this state.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loading(data) => data.as_ref(),
            Self::Success(data) => Some(data),
            Self::Error { stale, .. } => stale.as_ref(),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Loading(data) => data,
            Self::Success(data) => Some(data),
            Self::Error { stale, .. } => stale,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Self::Loading(data) => Resource::Loading(data.map(f)),
            Self::Success(data) => Resource::Success(f(data)),
            Self::Error { message, stale } => Resource::Error {
                message,
                stale: stale.map(f),
            },
        }
    }
}

/// A logical resource present both in the local store and the remote catalog.
///
/// Implementors supply the three primitives; [`network_bound`] supplies the
/// ordering.
#[async_trait]
pub trait BoundResource: Send + Sync {
    /// What observers see (domain entities joined with translations).
    type Local: Clone + Send + Sync + 'static;
    /// What the remote catalog returns.
    type Remote: Send + 'static;

    /// Short label for log lines.
    fn describe(&self) -> String;

    /// Read the current local snapshot.
    async fn query(&self) -> Result<Self::Local, RepositoryError>;

    /// Fetch from the remote catalog.
    async fn fetch(&self) -> Result<Self::Remote, RemoteError>;

    /// Write remote data through to the local store.
    ///
    /// Return `Some(fresh)` to emit that snapshot directly, or `None` to
    /// re-run [`query`](Self::query).
    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError>;

    /// Whether the remote fetch should run given the local snapshot.
    fn should_fetch(&self, _local: &Self::Local) -> bool {
        true
    }
}

enum Step<R: BoundResource> {
    Start(R),
    Query(R),
    Refresh(R, R::Local),
    Done,
}

/// Build the stale-while-revalidate stream for `resource`.
///
/// Nothing runs until the stream is polled. Each call performs its own
/// independent fetch.
pub fn network_bound<R>(resource: R) -> BoxStream<'static, Resource<R::Local>>
where
    R: BoundResource + 'static,
{
    stream::unfold(Step::Start(resource), |step| async move {
        match step {
            Step::Start(resource) => Some((Resource::Loading(None), Step::Query(resource))),
            Step::Query(resource) => match resource.query().await {
                Ok(local) => {
                    debug!(resource = %resource.describe(), "Emitting cached snapshot");
                    Some((
                        Resource::Loading(Some(local.clone())),
                        Step::Refresh(resource, local),
                    ))
                }
                Err(e) => {
                    warn!(resource = %resource.describe(), error = %e, "Local query failed");
                    Some((
                        Resource::Error {
                            message: message_of(&e),
                            stale: None,
                        },
                        Step::Done,
                    ))
                }
            },
            Step::Refresh(resource, local) => {
                let state = refresh(&resource, local).await;
                Some((state, Step::Done))
            }
            Step::Done => None,
        }
    })
    .boxed()
}

async fn refresh<R: BoundResource>(resource: &R, local: R::Local) -> Resource<R::Local> {
    if !resource.should_fetch(&local) {
        debug!(resource = %resource.describe(), "Cached snapshot is fresh enough, skipping fetch");
        return Resource::Success(local);
    }

    let remote = match resource.fetch().await {
        Ok(remote) => remote,
        Err(e) => {
            warn!(resource = %resource.describe(), error = %e, "Remote fetch failed, keeping cached data");
            return Resource::Error {
                message: message_of(&e),
                stale: Some(local),
            };
        }
    };

    let fresh = match resource.save(remote).await {
        Ok(Some(fresh)) => Ok(fresh),
        Ok(None) => resource.query().await,
        Err(e) => Err(e),
    };

    match fresh {
        Ok(fresh) => {
            debug!(resource = %resource.describe(), "Refreshed from remote");
            Resource::Success(fresh)
        }
        Err(e) => {
            warn!(resource = %resource.describe(), error = %e, "Write-through failed, keeping cached data");
            Resource::Error {
                message: message_of(&e),
                stale: Some(local),
            }
        }
    }
}

fn message_of(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// A resource backed by an in-memory "store" of numbers.
    struct FakeResource {
        store: Arc<Mutex<Vec<u32>>>,
        remote: Result<Vec<u32>, String>,
        fail_query: bool,
        fail_save: bool,
        return_from_save: bool,
        skip_fetch: bool,
        fetches: Arc<AtomicUsize>,
    }

    impl FakeResource {
        fn new(local: Vec<u32>, remote: Result<Vec<u32>, String>) -> Self {
            Self {
                store: Arc::new(Mutex::new(local)),
                remote,
                fail_query: false,
                fail_save: false,
                return_from_save: false,
                skip_fetch: false,
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl BoundResource for FakeResource {
        type Local = Vec<u32>;
        type Remote = Vec<u32>;

        fn describe(&self) -> String {
            "numbers".to_string()
        }

        async fn query(&self) -> Result<Vec<u32>, RepositoryError> {
            if self.fail_query {
                return Err(RepositoryError::Storage("disk gone".to_string()));
            }
            Ok(self.store.lock().await.clone())
        }

        async fn fetch(&self) -> Result<Vec<u32>, RemoteError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.remote
                .clone()
                .map_err(|message| RemoteError::Network { message })
        }

        async fn save(&self, remote: Vec<u32>) -> Result<Option<Vec<u32>>, RepositoryError> {
            if self.fail_save {
                return Err(RepositoryError::Constraint("FOREIGN KEY".to_string()));
            }
            *self.store.lock().await = remote.clone();
            Ok(self.return_from_save.then(|| remote.into_iter().map(|n| n * 10).collect()))
        }

        fn should_fetch(&self, _local: &Vec<u32>) -> bool {
            !self.skip_fetch
        }
    }

    async fn collect(resource: FakeResource) -> Vec<Resource<Vec<u32>>> {
        network_bound(resource).collect().await
    }

    #[tokio::test]
    async fn test_emits_local_then_remote() {
        let states = collect(FakeResource::new(vec![1], Ok(vec![1, 2]))).await;
        assert_eq!(
            states,
            vec![
                Resource::Loading(None),
                Resource::Loading(Some(vec![1])),
                Resource::Success(vec![1, 2]),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_cache_still_emits_cached_state() {
        let states = collect(FakeResource::new(vec![], Ok(vec![7]))).await;
        assert_eq!(states[1], Resource::Loading(Some(vec![])));
        assert_eq!(states[2], Resource::Success(vec![7]));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_stale_data() {
        let states = collect(FakeResource::new(vec![3], Err("offline".to_string()))).await;
        assert_eq!(states.len(), 3);
        assert_eq!(
            states[2],
            Resource::Error {
                message: "Network error: offline".to_string(),
                stale: Some(vec![3]),
            }
        );
        assert_eq!(states[2].data(), Some(&vec![3]));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_stale_data() {
        let mut resource = FakeResource::new(vec![3], Ok(vec![4]));
        resource.fail_save = true;
        let states = collect(resource).await;
        assert!(matches!(
            &states[2],
            Resource::Error { message, stale: Some(stale) }
                if message.contains("FOREIGN KEY") && stale == &vec![3]
        ));
    }

    #[tokio::test]
    async fn test_local_query_failure_ends_stream() {
        let mut resource = FakeResource::new(vec![], Ok(vec![1]));
        resource.fail_query = true;
        let fetches = Arc::clone(&resource.fetches);
        let states = collect(resource).await;
        assert_eq!(states.len(), 2);
        assert!(matches!(&states[1], Resource::Error { stale: None, .. }));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_save_may_return_snapshot() {
        let mut resource = FakeResource::new(vec![], Ok(vec![1, 2]));
        resource.return_from_save = true;
        let states = collect(resource).await;
        assert_eq!(states[2], Resource::Success(vec![10, 20]));
    }

    #[tokio::test]
    async fn test_should_fetch_false_skips_remote() {
        let mut resource = FakeResource::new(vec![5], Ok(vec![6]));
        resource.skip_fetch = true;
        let fetches = Arc::clone(&resource.fetches);
        let states = collect(resource).await;
        assert_eq!(states[2], Resource::Success(vec![5]));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let resource = FakeResource::new(vec![], Ok(vec![1]));
        let fetches = Arc::clone(&resource.fetches);
        let stream = network_bound(resource);
        drop(stream);
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_error_message_falls_back() {
        assert_eq!(message_of(&""), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(message_of(&"boom"), "boom");
    }

    #[test]
    fn test_resource_map() {
        let state = Resource::Error {
            message: "x".to_string(),
            stale: Some(2),
        };
        assert_eq!(state.map(|n| n * 2).into_data(), Some(4));
        assert!(Resource::<u8>::Loading(None).is_loading());
    }
}
