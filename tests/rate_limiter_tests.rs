//! Integration tests for the sliding-log rate limiter.
//!
//! Timing tests run on a paused Tokio clock so they are deterministic; the
//! end-to-end test uses real time against a mock server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use grocer_api::auth::InMemoryCredentialStore;
use grocer_api::{ApiClient, BaseUrl, ClientConfig, RateLimiter};
use rand::Rng;
use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WINDOW: Duration = Duration::from_millis(1000);

#[tokio::test(start_paused = true)]
async fn test_capacity_two_admits_third_after_window() {
    let limiter = RateLimiter::new(2, WINDOW);
    let start = Instant::now();

    let mut admitted = Vec::new();
    for _ in 0..3 {
        limiter.acquire().await;
        admitted.push(start.elapsed());
    }

    assert!(admitted[0] < Duration::from_millis(5));
    assert!(admitted[1] < Duration::from_millis(5));
    assert!(admitted[2] >= WINDOW);
}

#[tokio::test(start_paused = true)]
async fn test_no_window_ever_holds_more_than_capacity_under_random_load() {
    const CAPACITY: usize = 3;
    const CALLERS: usize = 40;

    let limiter = Arc::new(RateLimiter::new(CAPACITY as u32, WINDOW));
    let admissions = Arc::new(Mutex::new(Vec::with_capacity(CALLERS)));

    let mut rng = rand::thread_rng();
    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let delay = Duration::from_millis(rng.gen_range(0..3000));
        let limiter = limiter.clone();
        let admissions = admissions.clone();
        handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            limiter.acquire().await;
            admissions.lock().unwrap().push(Instant::now());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut times = admissions.lock().unwrap().clone();
    times.sort();
    assert_eq!(times.len(), CALLERS);

    // Any CAPACITY + 1 consecutive admissions must span at least one window.
    for i in 0..times.len() - CAPACITY {
        let span = times[i + CAPACITY] - times[i];
        assert!(
            span >= WINDOW,
            "admissions {i}..={} fit in {span:?}",
            i + CAPACITY
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_waiting_callers_are_not_starved() {
    let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(100)));
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            Instant::now()
        }));
    }

    let mut finished = Vec::new();
    for handle in handles {
        finished.push(handle.await.unwrap() - start);
    }
    finished.sort();

    // Ten callers at one per 100 ms: the last gets in at 900 ms.
    assert_eq!(finished.len(), 10);
    assert!(*finished.last().unwrap() >= Duration::from_millis(900));
    assert!(*finished.last().unwrap() < Duration::from_millis(1000));
}

#[tokio::test]
async fn test_client_requests_share_one_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/abcd/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abcd"})))
        .expect(3)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .rate_limit(2, Duration::from_millis(400))
        .build()
        .unwrap();
    let client = ApiClient::new(&config, Arc::new(InMemoryCredentialStore::new())).unwrap();

    let started = std::time::Instant::now();
    for _ in 0..3 {
        client.get_customer("abcd").await.unwrap();
    }

    assert!(started.elapsed() >= Duration::from_millis(400));
}
