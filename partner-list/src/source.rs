use std::{
    fmt::{self, Debug, Formatter},
    future::Future,
    pin::Pin,
    sync::Arc,
};

use leptos::prelude::*;
use tracing::{debug, warn};

use crate::{
    ConfigError, LoadError, LoadEvent, LoadEventVariant, PartnerListOptions, PartnerRecord,
    decode_partners,
    utils::{elapsed_ms_since, new_source_id},
};

/// Where a [`PartnerSource`] is in its single load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing has been requested yet.
    #[default]
    NotStarted,
    /// A fetch is in flight.
    Loading,
    /// The fetch resolved.
    Loaded(T),
    /// The fetch or decode failed. Stays failed until an explicit reload.
    Failed(LoadError),
}

impl<T> LoadState<T> {
    /// The loaded value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// The most [`LoadEvent`]s a [`PartnerSource`] keeps, oldest dropped first.
pub const MAX_LOAD_EVENTS: usize = 32;

type PartnerFetcher = Arc<
    dyn Fn() -> Pin<Box<dyn Future<Output = Result<Vec<PartnerRecord>, LoadError>> + Send>>
        + Send
        + Sync,
>;

/// Loads the partner list once and exposes the outcome as reactive state.
///
/// The loaded records are an immutable snapshot, shared by every clone of the source
/// and cached for its lifetime: [`PartnerSource::load`] only fetches the first time.
/// [`PartnerSource::reload`] is the only way to fetch again, there is no automatic retry.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct PartnerSource {
    id: u64,
    fetcher: PartnerFetcher,
    state: ArcRwSignal<LoadState<Arc<[PartnerRecord]>>>,
    events: ArcRwSignal<Vec<LoadEvent>>,
    // Serializes loads so concurrent callers share one fetch.
    // Never held together with a signal borrow.
    load_lock: Arc<futures::lock::Mutex<()>>,
}

impl Debug for PartnerSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerSource")
            .field("id", &self.id)
            .field("fetcher", &"Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<Vec<PartnerRecord>, LoadError>>>>>")
            .field("state", &self.state.get_untracked())
            .finish()
    }
}

impl PartnerSource {
    /// Create a source around any async fetch.
    pub fn new<Fut>(fetcher: impl Fn() -> Fut + Send + Sync + 'static) -> Self
    where
        Fut: Future<Output = Result<Vec<PartnerRecord>, LoadError>> + Send + 'static,
    {
        Self {
            id: new_source_id(),
            fetcher: Arc::new(move || {
                Box::pin(fetcher())
                    as Pin<Box<dyn Future<Output = Result<Vec<PartnerRecord>, LoadError>> + Send>>
            }),
            state: ArcRwSignal::new(LoadState::NotStarted),
            events: ArcRwSignal::new(vec![]),
            load_lock: Arc::new(futures::lock::Mutex::new(())),
        }
    }

    /// Create a source that issues a single unauthenticated `GET` to [`PartnerListOptions::endpoint`]
    /// and expects a JSON array of partners back.
    pub fn http(options: &PartnerListOptions) -> Result<Self, ConfigError> {
        let endpoint = options.endpoint();
        let url = reqwest::Url::parse(endpoint).map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self::new(move || {
            let client = client.clone();
            let url = url.clone();
            async move { fetch_partners(&client, url).await }
        }))
    }

    /// Load the partners, fetching only if nothing has been loaded or attempted yet.
    ///
    /// If another load is in flight, waits for it and returns its outcome.
    /// A previous failure is returned as is: call [`PartnerSource::reload`] to try again.
    pub async fn load(&self) -> Result<Arc<[PartnerRecord]>, LoadError> {
        let _guard = self.load_lock.lock().await;
        match self.state.get_untracked() {
            LoadState::Loaded(records) => {
                self.record(LoadEventVariant::CacheHit);
                Ok(records)
            }
            LoadState::Failed(err) => Err(err),
            LoadState::NotStarted | LoadState::Loading => self.fetch().await,
        }
    }

    /// Fetch again regardless of the current state, replacing it with the outcome.
    pub async fn reload(&self) -> Result<Arc<[PartnerRecord]>, LoadError> {
        let _guard = self.load_lock.lock().await;
        self.fetch().await
    }

    /// Kick off [`PartnerSource::load`] in the background and return immediately.
    ///
    /// The outcome is observed through [`PartnerSource::state`] and friends.
    /// Requires a leptos executor to have been initialised.
    pub fn start(&self) {
        let source = self.clone();
        leptos::task::spawn(async move {
            _ = source.load().await;
        });
    }

    // Callers must hold the load lock.
    async fn fetch(&self) -> Result<Arc<[PartnerRecord]>, LoadError> {
        debug!(source = self.id, "fetching partners");
        self.state.set(LoadState::Loading);
        self.record(LoadEventVariant::Started);

        let started_at = chrono::Utc::now();
        let outcome = (self.fetcher)().await;
        let elapsed_ms = elapsed_ms_since(started_at);

        match outcome {
            Ok(records) => {
                let records: Arc<[PartnerRecord]> = records.into();
                debug!(
                    source = self.id,
                    count = records.len(),
                    elapsed_ms,
                    "partners loaded"
                );
                self.state.set(LoadState::Loaded(records.clone()));
                self.record(LoadEventVariant::Fetched {
                    elapsed_ms,
                    count: records.len(),
                });
                Ok(records)
            }
            Err(err) => {
                warn!(source = self.id, elapsed_ms, error = %err, "failed to load partners");
                self.state.set(LoadState::Failed(err.clone()));
                self.record(LoadEventVariant::Failed { elapsed_ms });
                Err(err)
            }
        }
    }

    fn record(&self, variant: LoadEventVariant) {
        self.events.update(|events| {
            events.push(LoadEvent::new(variant));
            if events.len() > MAX_LOAD_EVENTS {
                let excess = events.len() - MAX_LOAD_EVENTS;
                events.drain(..excess);
            }
        });
    }

    /// The full load state.
    pub fn state(&self) -> LoadState<Arc<[PartnerRecord]>> {
        self.state.get()
    }

    /// Like [`PartnerSource::state`], without subscribing.
    pub fn state_untracked(&self) -> LoadState<Arc<[PartnerRecord]>> {
        self.state.get_untracked()
    }

    /// The loaded partners, `None` until a load succeeds.
    pub fn value(&self) -> Option<Arc<[PartnerRecord]>> {
        self.state.with(|state| state.value().cloned())
    }

    /// Like [`PartnerSource::value`], without subscribing.
    pub fn value_untracked(&self) -> Option<Arc<[PartnerRecord]>> {
        self.state.with_untracked(|state| state.value().cloned())
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.with(|state| state.is_loading())
    }

    /// Why the last load failed, if it did.
    pub fn error(&self) -> Option<LoadError> {
        self.state.with(|state| state.error().cloned())
    }

    /// The most recent [`MAX_LOAD_EVENTS`] things that happened to this source, oldest first.
    pub fn events(&self) -> Vec<LoadEvent> {
        self.events.get()
    }
}

async fn fetch_partners(
    client: &reqwest::Client,
    url: reqwest::Url,
) -> Result<Vec<PartnerRecord>, LoadError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| LoadError::Transport(err.to_string()))?;
    let body = response
        .text()
        .await
        .map_err(|err| LoadError::Transport(err.to_string()))?;
    decode_partners(&body)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use any_spawner::Executor;

    use super::*;
    use crate::test::{counting_source, failing_then_ok_source, partners};

    #[tokio::test]
    async fn test_load_once_then_cached() {
        let (source, fetch_calls) = counting_source(partners(32), Duration::ZERO);
        assert_eq!(source.state_untracked(), LoadState::NotStarted);
        assert_eq!(source.value_untracked(), None);

        let first = source.load().await.unwrap();
        assert_eq!(first.len(), 32);
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);

        let second = source.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);

        assert_eq!(source.value_untracked().map(|v| v.len()), Some(32));
        assert!(!source.is_loading());
        assert_eq!(source.error(), None);

        let variants = source
            .events()
            .into_iter()
            .map(|event| event.variant)
            .collect::<Vec<_>>();
        assert!(matches!(
            variants.as_slice(),
            [
                LoadEventVariant::Started,
                LoadEventVariant::Fetched { count: 32, .. },
                LoadEventVariant::CacheHit
            ]
        ));
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let (source, fetch_calls) = counting_source(partners(3), Duration::from_millis(20));
        let (a, b) = futures::join!(source.load(), source.load());
        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 3);
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_failure_is_sticky_until_reload() {
        let (source, fetch_calls) = failing_then_ok_source(partners(4));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
        assert_eq!(source.error(), Some(err.clone()));
        assert_eq!(source.value_untracked(), None);
        assert!(!source.is_loading());

        // No automatic retry:
        assert_eq!(source.load().await.unwrap_err(), err);
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);

        let records = source.reload().await.unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 2);
        assert_eq!(source.error(), None);
    }

    #[tokio::test]
    async fn test_reload_always_fetches() {
        let (source, fetch_calls) = counting_source(partners(2), Duration::ZERO);
        source.load().await.unwrap();
        source.reload().await.unwrap();
        source.reload().await.unwrap();
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_loading_flag_while_in_flight() {
        let (source, _fetch_calls) = counting_source(partners(1), Duration::from_millis(50));
        let background = {
            let source = source.clone();
            tokio::spawn(async move { source.load().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(source.is_loading());
        assert_eq!(source.value_untracked(), None);

        background.await.unwrap().unwrap();
        assert!(!source.is_loading());
        assert!(source.value_untracked().is_some());
    }

    #[tokio::test]
    async fn test_start_in_background() {
        _ = Executor::init_tokio();

        let (source, fetch_calls) = counting_source(partners(5), Duration::from_millis(5));
        source.start();

        for _ in 0..200 {
            if source.value_untracked().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(source.value_untracked().map(|v| v.len()), Some(5));
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_malformed_collapses_to_failed() {
        let fetch_calls = Arc::new(AtomicUsize::new(0));
        let source = PartnerSource::new({
            let fetch_calls = fetch_calls.clone();
            move || {
                fetch_calls.fetch_add(1, Ordering::Relaxed);
                async move { decode_partners("not json") }
            }
        });
        assert!(matches!(
            source.load().await,
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(source.state_untracked(), LoadState::Failed(_)));
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_event_log_is_bounded() {
        let (source, fetch_calls) = counting_source(partners(3), Duration::ZERO);
        for _ in 0..1000 {
            source.load().await.unwrap();
        }
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 1);

        let events = source.events();
        assert_eq!(events.len(), MAX_LOAD_EVENTS);
        // The fetch itself has been pushed out by cache hits:
        assert!(
            events
                .iter()
                .all(|event| event.variant == LoadEventVariant::CacheHit)
        );

        source.reload().await.unwrap();
        let events = source.events();
        assert_eq!(events.len(), MAX_LOAD_EVENTS);
        assert!(matches!(
            events[MAX_LOAD_EVENTS - 2..],
            [
                LoadEvent {
                    variant: LoadEventVariant::Started,
                    ..
                },
                LoadEvent {
                    variant: LoadEventVariant::Fetched { count: 3, .. },
                    ..
                }
            ]
        ));
    }

    #[test]
    fn test_http_rejects_invalid_endpoint() {
        let err = PartnerSource::http(&PartnerListOptions::new().with_endpoint("not a url"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_http_unreachable_is_transport_error() {
        // Nothing listens on the discard port locally:
        let source =
            PartnerSource::http(&PartnerListOptions::new().with_endpoint("http://127.0.0.1:9/"))
                .unwrap();
        assert!(matches!(
            source.load().await,
            Err(LoadError::Transport(_))
        ));
    }
}
