use illuminate::Markup;
use illuminate::core::action::{Action, Effect, update};
use illuminate::core::router::{Router, ScrollTarget};
use illuminate::source::{FetchError, FileSource, HttpSource, PageSource};
use illuminate::tui::doc::DocRenderer;
use std::collections::BTreeMap;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

const DOCS_JS: &str = "\
// = App =
// The application.
var App = {};

// == App.navigate() ==
// Goes places.
App.navigate = function () {};
";

fn router() -> Router<DocRenderer> {
    Router::new(DocRenderer::new(Markup::Creole, 40, BTreeMap::new())).with_chars_per_row(40)
}

// ============================================================================
// HttpSource Tests
// ============================================================================

#[tokio::test]
async fn test_http_source_fetches_page_text() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/src/docs.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCS_JS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = HttpSource::new(format!("{}/src/", mock_server.uri()));
    let text = source.fetch_text("docs.js").await.unwrap();
    assert_eq!(text, DOCS_JS);
}

#[tokio::test]
async fn test_http_source_reports_status_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = HttpSource::new(mock_server.uri());
    let result = source.fetch_text("missing.js").await;
    match result {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing.js"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_source_rejects_escaping_ids_without_a_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let source = HttpSource::new(mock_server.uri());
    let result = source.fetch_text("../etc/passwd").await;
    assert!(matches!(result, Err(FetchError::InvalidPageId(_))));
}

#[tokio::test]
async fn test_http_source_network_error() {
    // Nothing listens on port 9 (discard) on test machines
    let source = HttpSource::new("http://127.0.0.1:9");
    let result = source.fetch_text("docs.js").await;
    assert!(matches!(result, Err(FetchError::Network(_))));
}

// ============================================================================
// FileSource Tests
// ============================================================================

#[tokio::test]
async fn test_file_source_reads_nested_pages() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("lib/docs.js"), DOCS_JS).unwrap();

    let source = FileSource::new(dir.path());
    assert_eq!(source.fetch_text("lib/docs.js").await.unwrap(), DOCS_JS);
    assert!(matches!(
        source.fetch_text("lib/nope.js").await,
        Err(FetchError::Io(_))
    ));
}

// ============================================================================
// End-to-end: fragment → fetch → render → scroll
// ============================================================================

#[tokio::test]
async fn test_navigation_fetches_once_and_scrolls_to_anchor() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCS_JS))
        .expect(1)
        .mount(&mock_server)
        .await;
    let source = HttpSource::new(mock_server.uri());
    let mut router = router();

    let effects = update(
        &mut router,
        Action::FragmentChanged("#docs.js@App.navigate()".to_string()),
    );
    assert_eq!(
        effects,
        vec![
            Effect::Fetch("docs.js".to_string()),
            Effect::ScrollTo(ScrollTarget::Top)
        ]
    );

    // Navigating again before the fetch lands must not fetch twice
    let effects = update(&mut router, Action::FragmentChanged("#docs.js".to_string()));
    assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Top)]);
    let effects = update(
        &mut router,
        Action::FragmentChanged("#docs.js@App.navigate()".to_string()),
    );
    assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Top)]);

    let result = source.fetch_text("docs.js").await;
    let effects = update(
        &mut router,
        Action::PageFetched {
            page_id: "docs.js".to_string(),
            result,
        },
    );

    let page = router.current_page().unwrap();
    assert!(page.loaded);
    assert_eq!(page.blocks.len(), 2);
    let row = page.heading_offset("App.navigate()").unwrap();
    assert_eq!(row, page.blocks[0].height());
    assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Row(row))]);
}

#[tokio::test]
async fn test_failed_fetch_leaves_page_empty_with_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let source = HttpSource::new(mock_server.uri());
    let mut router = router();

    update(&mut router, Action::FragmentChanged("#broken.js".to_string()));
    let result = source.fetch_text("broken.js").await;
    let effects = update(
        &mut router,
        Action::PageFetched {
            page_id: "broken.js".to_string(),
            result,
        },
    );

    assert!(effects.is_empty());
    let page = router.current_page().unwrap();
    assert!(!page.loaded);
    assert!(page.blocks.is_empty());
    assert!(page.error.as_deref().unwrap().contains("HTTP 500"));
}
