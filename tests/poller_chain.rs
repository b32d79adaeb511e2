//! Poll-chain behavior against a mock changer backend.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use changer_monitor::changer_client::{
    CancellationToken, ChangerClient, HttpClient, JobState, SlotBoard, SlotIndex, StatusPoller,
};
use changer_monitor::config::Config;
use changer_monitor::types::MonitorError;

fn test_config(base_url: String) -> Config {
    Config {
        base_url,
        poll_interval_ms: 50,
        max_poll_attempts: 10,
        http_timeout_secs: 5,
        refresh_interval_secs: 0,
    }
}

fn http_client(server: &MockServer) -> HttpClient {
    HttpClient::new(vec![server.uri()], Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn chain_terminates_after_three_delayed_repolls() {
    let server = MockServer::start().await;

    // Mocks match in mount order and stop matching once exhausted, so the
    // backend answers PENDING, PENDING, PROGRESS, SUCCESS in sequence.
    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PENDING"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PROGRESS"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"state": "SUCCESS", "info": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let poller = StatusPoller::new(Duration::from_millis(50), 10);
    let started = Instant::now();
    let job = poller
        .run(&http_client(&server), "/changer/status", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.state, JobState::Success);
    // Three re-polls, each spaced at least the configured interval apart
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn updates_redirect_is_followed_without_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"state": "PENDING", "updates": "/job/7"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"state": "SUCCESS", "info": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // A two-second interval would dominate the elapsed time if the redirect
    // inserted a delay.
    let poller = StatusPoller::new(Duration::from_secs(2), 10);
    let started = Instant::now();
    let job = poller
        .run(&http_client(&server), "/changer/status", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.state, JobState::Success);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn end_to_end_status_refresh_renders_the_slot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"state": "PENDING", "updates": "/job/7"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PROGRESS"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "SUCCESS",
            "info": {"0": {"full": true, "album": "X", "artist": "Y"}}
        })))
        .mount(&server)
        .await;

    let client = ChangerClient::discover(&test_config(server.uri())).unwrap();
    let mut board = SlotBoard::new();
    client
        .refresh_board(&mut board, &CancellationToken::new())
        .await
        .unwrap();

    assert!(board.overview().available);
    let row = board.row(&SlotIndex::from("0")).unwrap();
    assert_eq!(row.state_label(), "Full");
    assert_eq!(row.album(), Some("X"));
    assert_eq!(row.artist(), Some("Y"));

    let rendered = board.render();
    assert!(rendered.contains("Full"));
    assert!(rendered.contains("X"));
    assert!(rendered.contains("Y"));
}

#[tokio::test]
async fn cancelled_token_stops_the_chain_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PENDING"})))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let poller = StatusPoller::new(Duration::from_millis(50), 10);
    let err = poller
        .run(&http_client(&server), "/changer/status", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::Canceled));
}

#[tokio::test]
async fn a_never_terminal_job_exhausts_the_poll_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PENDING"})))
        .expect(3)
        .mount(&server)
        .await;

    let poller = StatusPoller::new(Duration::from_millis(10), 3);
    let err = poller
        .run(&http_client(&server), "/changer/status", &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        MonitorError::PollBudget { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected PollBudget, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_refresh_marks_the_board_unreachable_until_the_next_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/changer/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "SUCCESS",
            "info": {"0": {"full": false}}
        })))
        .mount(&server)
        .await;

    let client = ChangerClient::discover(&test_config(server.uri())).unwrap();
    let cancel = CancellationToken::new();
    let mut board = SlotBoard::new();

    let err = client.refresh_board(&mut board, &cancel).await.unwrap_err();
    assert!(matches!(err, MonitorError::Changer(_)));
    assert!(!board.overview().available);
    assert!(board.render().contains("changer unreachable"));

    client.refresh_board(&mut board, &cancel).await.unwrap();
    assert!(board.overview().available);
    assert_eq!(
        board.row(&SlotIndex::from("0")).unwrap().state_label(),
        "Empty"
    );
}
