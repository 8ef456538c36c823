//! Integration tests for the session-stateful photoscroll strategy.
//!
//! The continuation protocol is order-sensitive upstream; these tests pin
//! the request mix (priming HEADs vs terminal GET) via wiremock expect
//! counts and cover the end-of-content probe.

use specimen_gallery::{PageBatch, PagerError, PhotoscrollPager, SiteConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// First-page search response: `count` images inside the scroll container.
fn scroll_page(count: usize) -> String {
    let mut html = String::from(r#"<html><body><div id="photoscroll">"#);
    for i in 0..count {
        html.push_str(&format!(r#"<img src="/scroll/{i}.jpg">"#));
    }
    html.push_str("</div></body></html>");
    html
}

/// Continuation response: a bare fragment of `count` images starting at `first`.
fn continuation_fragment(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!(r#"<img src="/scroll/{i}.jpg">"#))
        .collect()
}

async fn pager_for(server: &MockServer) -> PhotoscrollPager {
    let site = SiteConfig::new(&server.uri()).unwrap();
    PhotoscrollPager::new(site).unwrap()
}

#[tokio::test]
async fn test_first_page_slice_no_probe_mid_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("searchbox", "quartz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scroll_page(50)))
        .expect(1)
        .mount(&server)
        .await;

    // Not at the end of the list, so the continuation endpoint stays quiet.
    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("quartz", 10, 5, true).await.unwrap();

    let base = server.uri();
    let expected: Vec<String> = (10..15)
        .map(|i| format!("{base}/scroll/{i}.jpg"))
        .collect();
    assert_eq!(batch.urls, expected);
    assert_eq!(batch.next_cursor, 15);
}

#[tokio::test]
async fn test_padded_tail_probes_and_wraps_when_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("searchbox", "tigereye"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scroll_page(50)))
        .expect(1)
        .mount(&server)
        .await;

    // The probe finds nothing beyond the current page.
    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("tigereye", 48, 5, true).await.unwrap();

    // Slice [48..50] is short, padded to the last 5; the padded slice ends
    // on the list's last URL, the probe comes back empty, cursor wraps.
    assert_eq!(batch.urls.len(), 5);
    let base = server.uri();
    let expected: Vec<String> = (45..50)
        .map(|i| format!("{base}/scroll/{i}.jpg"))
        .collect();
    assert_eq!(batch.urls, expected);
    assert_eq!(batch.next_cursor, 0);
}

#[tokio::test]
async fn test_padded_tail_keeps_cursor_when_more_content_exists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("searchbox", "tigereye"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scroll_page(50)))
        .mount(&server)
        .await;

    // The probe finds another page: more content to serve next call.
    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(continuation_fragment(50, 15)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("tigereye", 48, 5, true).await.unwrap();

    assert_eq!(batch.urls.len(), 5);
    assert_eq!(batch.next_cursor, 53);
}

#[tokio::test]
async fn test_continuation_primes_session_then_fetches() {
    let server = MockServer::start().await;

    // cursor 50 lands on the first continuation page: one priming HEAD
    // against the search endpoint, no advances, one terminal GET.
    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .and(query_param("searchbox", "opal"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(continuation_fragment(50, 15)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("opal", 50, 5, true).await.unwrap();

    let base = server.uri();
    let expected: Vec<String> = (50..55)
        .map(|i| format!("{base}/scroll/{i}.jpg"))
        .collect();
    assert_eq!(batch.urls, expected);
    assert_eq!(batch.next_cursor, 55);
}

#[tokio::test]
async fn test_deep_cursor_advances_session_page_by_page() {
    let server = MockServer::start().await;

    // cursor 80 -> pages = (80-50)/15 + 2 = 4: prime, 2 advances, 1 GET.
    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .and(query_param("searchbox", "opal"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(continuation_fragment(80, 15)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("opal", 80, 5, true).await.unwrap();

    // Offset (80-50) % 15 = 0 within the fetched page.
    let base = server.uri();
    let expected: Vec<String> = (80..85)
        .map(|i| format!("{base}/scroll/{i}.jpg"))
        .collect();
    assert_eq!(batch.urls, expected);
    assert_eq!(batch.next_cursor, 85);
}

#[tokio::test]
async fn test_empty_continuation_body_exhausts_session() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("opal", 65, 5, true).await.unwrap();
    assert_eq!(batch, PageBatch::exhausted());
}

#[tokio::test]
async fn test_empty_first_page_results_exhaust_strategy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><div id="photoscroll"></div></body></html>"#),
        )
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let batch = pager.fetch("unobtainium", 0, 5, true).await.unwrap();
    assert_eq!(batch, PageBatch::exhausted());
}

#[tokio::test]
async fn test_missing_scroll_container_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photoscroll.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let err = pager.fetch("quartz", 0, 5, true).await.unwrap_err();
    assert!(matches!(err, PagerError::Parse { .. }), "got: {err}");
}

#[tokio::test]
async fn test_priming_head_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/photoscroll.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pager = pager_for(&server).await;
    let err = pager.fetch("opal", 65, 5, true).await.unwrap_err();
    assert!(
        matches!(err, PagerError::HttpStatus { status: 500, .. }),
        "got: {err}"
    );
}
