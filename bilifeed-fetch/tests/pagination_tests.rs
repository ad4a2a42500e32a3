//! Pagination engine tests against a scripted feed source.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bilifeed_core::QueryMode;
use bilifeed_fetch::{
    Credentials, FeedPage, FeedResponse, FeedSource, FetchError, FetchOptions, PageObserver,
    PageProgress, PageRequest, Pager, RetryPolicy, SilentObserver, Sleeper,
};
use bilifeed_store::{CacheStore, compute_fingerprint};

// ============================================================================
// Fixtures
// ============================================================================

/// Replays canned responses and records every request.
#[derive(Default)]
struct ScriptedSource {
    responses: Mutex<VecDeque<FeedResponse>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    fn new(responses: Vec<FeedResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FeedResponse::failure(-500, "script exhausted")))
    }
}

#[derive(Default)]
struct RecordingSleeper(Mutex<Vec<f64>>);

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, secs: f64) {
        self.0.lock().unwrap().push(secs);
    }
}

/// Records callbacks and answers the page prompt with `answer`.
struct RecordingObserver {
    answer: bool,
    pages: Mutex<Vec<PageProgress>>,
    failures: Mutex<Vec<(i64, String)>>,
    prompts: Mutex<Vec<u32>>,
    cache_hits: Mutex<Vec<usize>>,
}

impl RecordingObserver {
    fn new(answer: bool) -> Self {
        Self {
            answer,
            pages: Mutex::default(),
            failures: Mutex::default(),
            prompts: Mutex::default(),
            cache_hits: Mutex::default(),
        }
    }
}

#[async_trait]
impl PageObserver for RecordingObserver {
    fn on_cache_hit(&self, count: usize) {
        self.cache_hits.lock().unwrap().push(count);
    }

    fn on_page(&self, progress: &PageProgress) {
        self.pages.lock().unwrap().push(progress.clone());
    }

    fn on_failure(&self, code: i64, message: &str) {
        self.failures.lock().unwrap().push((code, message.to_string()));
    }

    async fn confirm_continue(&self, next_page: u32) -> bool {
        self.prompts.lock().unwrap().push(next_page);
        self.answer
    }
}

fn item(id: u64, mid: u64, ts: i64) -> Value {
    json!({
        "id_str": id.to_string(),
        "type": "DYNAMIC_TYPE_WORD",
        "modules": {
            "module_author": {"name": format!("up{mid}"), "mid": mid, "pub_ts": ts},
            "module_dynamic": {"desc": {"text": format!("post {id}")}}
        }
    })
}

fn page(items: Vec<Value>, offset: &str, has_more: bool) -> FeedResponse {
    FeedResponse::success(FeedPage {
        items,
        offset: offset.to_string(),
        update_baseline: String::new(),
        has_more,
    })
}

fn credentials() -> Credentials {
    Credentials::new("", "sess-token")
}

fn options() -> FetchOptions {
    FetchOptions {
        use_cache: false,
        retry: RetryPolicy::no_retry(),
        ..Default::default()
    }
}

fn pager(source: Arc<ScriptedSource>, sleeper: Arc<RecordingSleeper>) -> Pager {
    Pager::new(source).with_sleeper(sleeper)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_collects_pages_in_order() {
    let first: Vec<Value> = (0..20).map(|i| item(100 + i, 1, 2_000 - i as i64)).collect();
    let second: Vec<Value> = (0..5).map(|i| item(200 + i, 1, 1_000 - i as i64)).collect();
    let source = ScriptedSource::new(vec![page(first, "o1", true), page(second, "o2", false)]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let posts = pager(source.clone(), sleeper)
        .run(&options(), &credentials(), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(posts.len(), 25);
    assert_eq!(posts[0].id, "100");
    assert_eq!(posts[24].id, "204");

    let requests = source.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].offset, "");
    assert_eq!(requests[1].offset, "o1");
}

#[tokio::test]
async fn test_selected_up_keeps_targets_only() {
    let items = vec![
        item(1, 10, 500),
        item(2, 20, 499),
        item(3, 30, 498),
        item(4, 40, 497),
        item(5, 10, 496),
    ];
    let source = ScriptedSource::new(vec![page(items, "", false)]);
    let observer = RecordingObserver::new(true);
    let opts = FetchOptions {
        query_mode: QueryMode::SelectedUp,
        target_up_mids: "10,30,50".to_string(),
        ..options()
    };

    let posts = pager(source, Arc::default())
        .run(&opts, &credentials(), &observer)
        .await
        .unwrap();

    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "3", "5"]);

    let pages = observer.pages.lock().unwrap();
    assert_eq!(pages[0].items, 5);
    assert_eq!(pages[0].kept, 3);
}

#[tokio::test]
async fn test_stops_once_page_predates_window() {
    let source = ScriptedSource::new(vec![
        page(vec![item(1, 1, 1_000), item(2, 1, 900)], "o1", true),
        page(vec![item(3, 1, 800)], "o2", true),
    ]);
    let opts = FetchOptions {
        start_ts: 950,
        ..options()
    };

    let posts = pager(source.clone(), Arc::default())
        .run(&opts, &credentials(), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "1");
}

#[tokio::test]
async fn test_untimed_page_never_stops_early() {
    let untimed = json!({"id_str": "9", "modules": {"module_author": {"mid": 1}}});
    let source = ScriptedSource::new(vec![
        page(vec![untimed], "o1", true),
        page(vec![item(2, 1, 2_000)], "o2", false),
    ]);
    let opts = FetchOptions {
        start_ts: 1_500,
        ..options()
    };

    let posts = pager(source.clone(), Arc::default())
        .run(&opts, &credentials(), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "2");
}

#[tokio::test]
async fn test_failure_keeps_partial_results() {
    let source = ScriptedSource::new(vec![
        page(vec![item(1, 1, 100)], "o1", true),
        FeedResponse::failure(-352, "risk control"),
    ]);
    let observer = RecordingObserver::new(true);

    let posts = pager(source, Arc::default())
        .run(&options(), &credentials(), &observer)
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(
        *observer.failures.lock().unwrap(),
        vec![(-352, "risk control".to_string())]
    );
}

#[tokio::test]
async fn test_declined_prompt_stops() {
    let source = ScriptedSource::new(vec![
        page(vec![item(1, 1, 100)], "o1", true),
        page(vec![item(2, 1, 90)], "o2", true),
    ]);
    let observer = RecordingObserver::new(false);
    let opts = FetchOptions {
        interactive: true,
        ..options()
    };

    let posts = pager(source.clone(), Arc::default())
        .run(&opts, &credentials(), &observer)
        .await
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(posts.len(), 1);
    assert_eq!(*observer.prompts.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn test_sleeps_between_pages_only() {
    let source = ScriptedSource::new(vec![
        page(vec![item(1, 1, 100)], "o1", true),
        page(vec![item(2, 1, 90)], "o2", true),
        page(vec![item(3, 1, 80)], "o3", true),
    ]);
    let sleeper = Arc::new(RecordingSleeper::default());
    let opts = FetchOptions {
        pages: 3,
        request_interval_secs: 0.5,
        ..options()
    };

    let posts = pager(source.clone(), sleeper.clone())
        .run(&opts, &credentials(), &SilentObserver)
        .await
        .unwrap();

    assert_eq!(posts.len(), 3);
    assert_eq!(source.calls(), 3);
    assert_eq!(*sleeper.0.lock().unwrap(), vec![0.5, 0.5]);
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheStore::new(dir.path());
    let opts = FetchOptions {
        use_cache: true,
        ..options()
    };
    let creds = credentials();

    let cached = vec![bilifeed_core::normalize_item(&item(7, 1, 100))];
    let fingerprint = compute_fingerprint(&opts.query_shape(&creds));
    cache.save(&fingerprint, &cached).await.unwrap();

    let source = ScriptedSource::new(vec![]);
    let observer = RecordingObserver::new(true);
    let posts = pager(source.clone(), Arc::default())
        .with_cache(cache)
        .run(&opts, &creds, &observer)
        .await
        .unwrap();

    assert_eq!(source.calls(), 0);
    assert_eq!(posts, cached);
    assert_eq!(*observer.cache_hits.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn test_fetched_posts_are_cached() {
    let dir = tempfile::tempdir().unwrap();
    let opts = FetchOptions {
        use_cache: true,
        ..options()
    };
    let creds = credentials();
    let fingerprint = compute_fingerprint(&opts.query_shape(&creds));

    let source = ScriptedSource::new(vec![page(vec![item(1, 1, 100)], "", false)]);
    pager(source, Arc::default())
        .with_cache(CacheStore::new(dir.path()))
        .run(&opts, &creds, &SilentObserver)
        .await
        .unwrap();

    let stored = CacheStore::new(dir.path()).load(&fingerprint, 60).await;
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_empty_result_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let opts = FetchOptions {
        use_cache: true,
        ..options()
    };

    let source = ScriptedSource::new(vec![page(vec![], "", false)]);
    let posts = pager(source, Arc::default())
        .with_cache(CacheStore::new(dir.path()))
        .run(&opts, &credentials(), &SilentObserver)
        .await
        .unwrap();

    assert!(posts.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_request() {
    let source = ScriptedSource::new(vec![]);
    let result = pager(source.clone(), Arc::default())
        .run(&options(), &Credentials::default(), &SilentObserver)
        .await;

    assert!(matches!(result, Err(FetchError::NoCredentials)));
    assert_eq!(source.calls(), 0);
}
