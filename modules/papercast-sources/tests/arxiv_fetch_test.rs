//! Topic search and paper download against a local stand-in for arXiv.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use papercast_common::{DocumentSource, SortOrder};
use papercast_sources::{DocumentResolver, ResolverConfig, SourceError};

struct FakeArxiv {
    base: String,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn atom_feed(base: &str, ids: &[&str]) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<entry>
    <id>http://arxiv.org/abs/{id}</id>
    <updated>2024-02-01T00:00:00Z</updated>
    <title>Study {id}</title>
    <link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>
    <link title="pdf" href="{base}/pdf/{id}" rel="related" type="application/pdf"/>
  </entry>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>http://arxiv.org/api/query</id>
  <title>arXiv Query</title>
  <updated>2024-02-01T00:00:00Z</updated>
  {entries}
</feed>"#
    )
}

/// Serves a feed listing `ids`; `/pdf/{id}` returns a one-page PDF reading
/// "Findings of {id}", except ids starting with "missing" which 404.
async fn fake_arxiv(ids: &'static [&'static str]) -> FakeArxiv {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let queries = Arc::new(Mutex::new(Vec::new()));

    let feed = atom_feed(&base, ids);
    let seen = queries.clone();
    let app = Router::new()
        .route(
            "/api/query",
            get(move |Query(params): Query<HashMap<String, String>>| {
                seen.lock().unwrap().push(params);
                let feed = feed.clone();
                async move { ([(header::CONTENT_TYPE, "application/atom+xml")], feed) }
            }),
        )
        .route(
            "/pdf/{id}",
            get(|Path(id): Path<String>| async move {
                if id.starts_with("missing") {
                    return StatusCode::NOT_FOUND.into_response();
                }
                let pdf = common::pdf_with_pages(&[&format!("Findings of {id}")]);
                ([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response()
            }),
        );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeArxiv { base, queries }
}

fn resolver(base: &str, scratch: &std::path::Path) -> DocumentResolver {
    DocumentResolver::new(ResolverConfig {
        arxiv_url: format!("{base}/api/query"),
        scratch_dir: Some(scratch.to_path_buf()),
        ..ResolverConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn search_returns_first_count_links_in_feed_order() {
    let arxiv = fake_arxiv(&["q1", "q2", "q3", "q4", "q5"]).await;
    let scratch = tempfile::tempdir().unwrap();

    let links = resolver(&arxiv.base, scratch.path())
        .search("quantum computing", 3, SortOrder::Relevance)
        .await
        .unwrap();

    let urls: Vec<String> = links.iter().map(|l| l.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/pdf/q1", arxiv.base),
            format!("{}/pdf/q2", arxiv.base),
            format!("{}/pdf/q3", arxiv.base),
        ]
    );

    let queries = arxiv.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0]["search_query"], "all:quantum computing");
    assert_eq!(queries[0]["sortBy"], "relevance");
    assert_eq!(queries[0]["max_results"], "3");
}

#[tokio::test]
async fn empty_feed_means_no_papers() {
    let arxiv = fake_arxiv(&[]).await;
    let scratch = tempfile::tempdir().unwrap();

    let papers = resolver(&arxiv.base, scratch.path())
        .search_and_fetch("nothing matches this", 3, SortOrder::SubmittedDate)
        .await
        .unwrap();

    assert!(papers.is_empty());
}

#[tokio::test]
async fn search_and_fetch_isolates_failed_downloads() {
    let arxiv = fake_arxiv(&["p1", "missing-p2", "p3"]).await;
    let scratch = tempfile::tempdir().unwrap();

    let papers = resolver(&arxiv.base, scratch.path())
        .search_and_fetch("graph neural networks", 3, SortOrder::Relevance)
        .await
        .unwrap();

    assert_eq!(papers.len(), 3);

    let first = papers[0].document.as_ref().unwrap();
    assert!(first.text.contains("Findings of p1"));
    assert_eq!(
        first.source,
        DocumentSource::Arxiv {
            url: format!("{}/pdf/p1", arxiv.base)
        }
    );

    assert!(matches!(
        papers[1].document,
        Err(SourceError::Http { status: 404, .. })
    ));
    assert!(papers[2].document.as_ref().unwrap().text.contains("Findings of p3"));

    let leftovers = std::fs::read_dir(scratch.path()).unwrap().count();
    assert_eq!(leftovers, 0, "scratch PDFs should be deleted after use");
}

#[tokio::test]
async fn search_error_status_is_reported() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new().route(
        "/api/query",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let scratch = tempfile::tempdir().unwrap();

    let err = resolver(&base, scratch.path())
        .search("llm agents", 3, SortOrder::Relevance)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Http { status: 503, .. }));
}

#[tokio::test]
async fn empty_topic_never_hits_the_network() {
    let scratch = tempfile::tempdir().unwrap();
    let err = resolver("http://127.0.0.1:9", scratch.path())
        .search("  ", 3, SortOrder::Relevance)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::EmptyTopic));
}
