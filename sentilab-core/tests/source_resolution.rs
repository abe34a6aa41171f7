//! Integration tests for price source resolution and the single-step feeds,
//! driven by the scripted transport.

use std::sync::Arc;

use sentilab_core::config::{ApiConfig, QueryConfig};
use sentilab_core::data::{
    Backend, DataError, Endpoints, FeedFetcher, ScriptedTransport, SourceResolver, SourceTag,
};
use sentilab_core::Signal;

const API_BODY: &str = r#"{"ticker":"AAPL","source":"cache","data":[
    {"Date":"2024-03-01","Open":179.5,"High":181.0,"Low":178.9,"Close":180.0,"Volume":5.1e7,"sentiment":0.08,"signal":"Buy","equity":1.0},
    {"Date":"2024-03-04","Open":180.2,"High":182.3,"Low":179.8,"Close":181.9,"Volume":4.7e7,"sentiment":null,"signal":"Hold","equity":1.01}
]}"#;

const CSV_BODY: &str = "Date,Open,High,Low,Close,Volume,sentiment,signal,equity\n\
2024-03-01 00:00:00-05:00,179.5,181.0,178.9,180.0,51000000,0.08,Buy,1.0\n\
2024-03-04 00:00:00-05:00,180.2,182.3,179.8,181.9,47000000,,Hold,1.01\n\
,1,1,1,1,1,,,\n";

fn backend(transport: ScriptedTransport) -> (Backend, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    let endpoints = Endpoints::new(&ApiConfig::default(), &QueryConfig::default()).unwrap();
    (Backend::new(transport.clone(), endpoints), transport)
}

#[tokio::test]
async fn api_success_is_tagged_api() {
    let (backend, transport) = backend(ScriptedTransport::new().ok("/api/data", API_BODY));
    let resolved = SourceResolver::new(backend).resolve("AAPL", "6mo").await.unwrap();

    assert_eq!(resolved.source, SourceTag::Api);
    assert_eq!(resolved.observations.len(), 2);
    assert_eq!(resolved.observations[0].signal, Some(Signal::Buy));
    assert_eq!(resolved.observations[1].sentiment, None);
    assert_eq!(transport.requests().len(), 1);
    assert!(transport.requests()[0].contains("sentiment_model=vader"));
}

#[tokio::test]
async fn api_rejection_falls_back_to_csv() {
    let (backend, transport) = backend(
        ScriptedTransport::new()
            .unreachable("/api/data")
            .ok("/data/AAPL_merged.csv", CSV_BODY),
    );
    let resolved = SourceResolver::new(backend.clone())
        .resolve("AAPL", "6mo")
        .await
        .unwrap();

    assert_eq!(resolved.source, SourceTag::Csv);
    // the dateless CSV row is dropped
    assert_eq!(resolved.observations.len(), 2);
    assert_eq!(resolved.observations[0].date, "2024-03-01 00:00:00-05:00");
    assert_eq!(resolved.observations[1].sentiment, None);

    let direct = SourceResolver::new(backend).fetch_csv("AAPL").await.unwrap();
    assert_eq!(resolved.observations, direct);

    let urls = transport.requests();
    assert!(urls[0].contains("/api/data"));
    assert!(urls[1].ends_with("/data/AAPL_merged.csv"));
}

#[tokio::test]
async fn server_error_and_missing_data_both_fall_back() {
    for api in [
        ScriptedTransport::new().status("/api/data", 500, r#"{"detail":"boom"}"#),
        ScriptedTransport::new().ok("/api/data", r#"{"detail":"no data key"}"#),
        ScriptedTransport::new().ok("/api/data", "<html>"),
    ] {
        let (backend, _) = backend(api.ok("_merged.csv", CSV_BODY));
        let resolved = SourceResolver::new(backend).resolve("AAPL", "6mo").await.unwrap();
        assert_eq!(resolved.source, SourceTag::Csv);
    }
}

#[tokio::test]
async fn both_failing_surfaces_csv_error() {
    let (backend, _) = backend(
        ScriptedTransport::new()
            .unreachable("/api/data")
            .status("_merged.csv", 404, "not found"),
    );
    let err = SourceResolver::new(backend).resolve("AAPL", "6mo").await.unwrap_err();
    assert!(matches!(err, DataError::Network(ref m) if m.contains("HTTP 404")), "{err}");
}

#[tokio::test]
async fn malformed_csv_is_terminal_parse_error() {
    let (backend, _) = backend(
        ScriptedTransport::new()
            .unreachable("/api/data")
            .ok("_merged.csv", "Date,Close\n2024-01-02,1,extra\n"),
    );
    let err = SourceResolver::new(backend).resolve("AAPL", "6mo").await.unwrap_err();
    assert!(matches!(err, DataError::Parse(_)), "{err}");
}

#[tokio::test]
async fn refresh_never_falls_back() {
    let (backend, transport) = backend(
        ScriptedTransport::new()
            .status("refresh=true", 500, "pipeline failed")
            .ok("_merged.csv", CSV_BODY),
    );
    let err = SourceResolver::new(backend).refresh("AAPL", "6mo").await.unwrap_err();
    assert!(matches!(err, DataError::Network(_)));
    assert_eq!(transport.requests().len(), 1);
    assert!(transport.requests()[0].contains("refresh=true"));
}

#[tokio::test]
async fn feeds_parse_their_envelopes() {
    let (backend, _) = backend(
        ScriptedTransport::new()
            .ok(
                "/api/entity",
                r#"{"name":"Warren Buffett","source":"news","data":[
                    {"Date":"2024-03-02","sentiment":0.3,"count":4},
                    {"Date":"2024-03-01","sentiment":-0.1,"count":2}]}"#,
            )
            .ok(
                "/api/holdings",
                r#"{"name":"Berkshire","cik":"0001067983","filing_date":"2024-05-15",
                    "holdings":[{"issuer":"APPLE INC","title":"COM","value":"1000","shares":"10"}]}"#,
            )
            .ok(
                "/api/insiders",
                r#"{"ticker":"AAPL","cik":"0000320193","filings":[
                    {"filing_date":"2024-05-01","accession":"0000320193-24-000081","document":"form4.xml"}]}"#,
            )
            .ok("/api/tickers", r#"{"tickers":["AAPL"]}"#),
    );
    let feeds = FeedFetcher::new(backend);

    let entity = feeds.entity_sentiment("Warren Buffett").await.unwrap();
    assert_eq!(entity.len(), 2);
    assert_eq!(entity[0].sentiment, Some(0.3));

    let holdings = feeds.holdings("Berkshire").await.unwrap();
    assert_eq!(holdings.holdings[0].shares, Some(10.0));
    assert_eq!(holdings.filing_date.as_deref(), Some("2024-05-15"));

    let insiders = feeds.insiders("AAPL").await.unwrap();
    assert_eq!(insiders.filings[0].document, "form4.xml");

    assert_eq!(feeds.tickers().await.unwrap(), ["AAPL"]);
    assert!(matches!(feeds.health().await, Err(DataError::Network(_))));
}

#[tokio::test]
async fn feed_without_expected_key_is_missing_data() {
    let (backend, _) = backend(
        ScriptedTransport::new()
            .ok("/api/holdings", r#"{"name":"Nobody","matches":[]}"#)
            .ok("/api/insiders", r#"{"ticker":"ZZZZ","cik":null}"#),
    );
    let feeds = FeedFetcher::new(backend);
    assert_eq!(
        feeds.holdings("Nobody").await.unwrap_err(),
        DataError::missing("holdings")
    );
    assert_eq!(
        feeds.insiders("ZZZZ").await.unwrap_err(),
        DataError::missing("filings")
    );
}
