mod common;

use common::{EchoLlm, FakeSummarizer, api_source, log_rows, session};
use mockito::Matcher;
use std::sync::Arc;

const TWO_ARTICLES: &str = r#"{
    "status": "ok",
    "totalResults": 2,
    "articles": [
        {"title": "A", "content": "longtext about the budget and what it means for taxpayers [+1200 chars]"},
        {"title": "B", "description": "short"}
    ]
}"#;

#[tokio::test]
async fn test_two_articles_become_two_logged_headlines() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/top-headlines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("country".into(), "in".into()),
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
        ]))
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_ARTICLES)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let batch = session.headlines().await;

    assert!(batch.warning.is_none());
    assert_eq!(batch.headlines.len(), 2);
    assert_eq!(batch.headlines[0].title, "A");
    assert_eq!(batch.headlines[1].title, "B");
    assert!(batch.headlines.iter().all(|h| !h.summary.is_empty()));
    assert_eq!(batch.headlines[1].summary, "Summary of: short");
    assert_eq!(log_rows(&log), 2);

    let written = std::fs::read_to_string(&log).unwrap();
    assert!(written.contains(",Headline,A,"));
    assert!(written.contains(",Headline,B,Summary of: short"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_source_yields_warning_and_no_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(429)
        .with_body(r#"{"status":"error","code":"rateLimited"}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let batch = session.headlines().await;

    assert!(batch.is_empty());
    assert_eq!(batch.warning.as_deref(), Some("Failed to fetch news: 429"));
    assert_eq!(log_rows(&log), 0);
    assert!(!log.exists());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_summarizer_failure_falls_back_and_still_logs() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(r#"{"articles":[{"title":"C","content":"hello world"},{"title":"D","content":"fine"}]}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(
        api_source(&server.url(), 5),
        FakeSummarizer::failing_on("hello world"),
        EchoLlm,
        &log,
    );

    let batch = session.headlines().await;

    assert_eq!(batch.headlines.len(), 2);
    assert_eq!(batch.headlines[0].title, "C");
    assert_eq!(batch.headlines[0].summary, "hello world...");
    assert_eq!(batch.headlines[1].summary, "Summary of: fine");
    assert_eq!(log_rows(&log), 2);
    assert!(std::fs::read_to_string(&log).unwrap().contains(",Headline,C,hello world...\r\n"));
}

#[tokio::test]
async fn test_articles_without_body_or_title_are_skipped() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(
            r#"{"articles":[
                {"title":"No body"},
                {"content":"No title"},
                {"title":"Kept","description":"desc","content":null},
                {"title":"Blank","content":"   ","description":""}
            ]}"#,
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let batch = session.headlines().await;

    assert_eq!(batch.headlines.len(), 1);
    assert_eq!(batch.headlines[0].title, "Kept");
    assert_eq!(log_rows(&log), 1);
}

#[tokio::test]
async fn test_batch_capped_at_page_size() {
    let mut server = mockito::Server::new_async().await;
    let articles: Vec<String> = (1..=8)
        .map(|i| format!(r#"{{"title":"T{i}","description":"d{i}"}}"#))
        .collect();
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .match_query(Matcher::UrlEncoded("pageSize".into(), "3".into()))
        .with_status(200)
        .with_body(format!(r#"{{"articles":[{}]}}"#, articles.join(",")))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 3), FakeSummarizer::ok(), EchoLlm, &log);

    let titles: Vec<String> = session
        .headlines()
        .await
        .headlines
        .iter()
        .map(|h| h.title.clone())
        .collect();
    assert_eq!(titles, vec!["T1", "T2", "T3"]);
}

#[tokio::test]
async fn test_malformed_response_is_source_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let batch = session.headlines().await;
    assert!(batch.is_empty());
    assert!(
        batch
            .warning
            .as_deref()
            .unwrap()
            .starts_with("Failed to fetch news: could not parse news api response")
    );
}

#[tokio::test]
async fn test_headlines_are_cached_until_refresh() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(TWO_ARTICLES)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let first = session.headlines().await;
    let second = session.headlines().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(log_rows(&log), 2);

    let refreshed = session.refresh().await;
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(refreshed.headlines, first.headlines);
    assert_eq!(log_rows(&log), 4);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_question_after_refresh_sees_only_new_batch() {
    let mut server = mockito::Server::new_async().await;
    let old = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(r#"{"articles":[{"title":"Old","description":"yesterday"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let before = session.ask("What happened?").await;
    assert_eq!(before.context, "Old\nSummary of: yesterday");
    old.assert_async().await;
    old.remove_async().await;

    let new = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(r#"{"articles":[{"title":"New","description":"today"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let refreshed = session.refresh().await;
    assert_eq!(refreshed.headlines[0].title, "New");

    let after = session.ask("What happened?").await;
    assert_eq!(after.context, "New\nSummary of: today");
    assert!(!after.answer.contains("Old"));
    assert!(!after.answer.contains("yesterday"));
    assert_eq!(log_rows(&log), 2);

    new.assert_async().await;
}

#[tokio::test]
async fn test_question_uses_current_batch_context() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(200)
        .with_body(r#"{"articles":[{"title":"B","description":"short"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    session.headlines().await;
    let exchange = session.ask("What is short?").await;

    assert_eq!(exchange.context, "B\nSummary of: short");
    assert_eq!(
        exchange.answer,
        "ANSWER[B\nSummary of: short\n\nQuestion: What is short?]"
    );
}

#[tokio::test]
async fn test_question_with_empty_batch_still_answers() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/top-headlines")
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("news_log.csv");
    let session = session(api_source(&server.url(), 5), FakeSummarizer::ok(), EchoLlm, &log);

    let exchange = session.ask("Anything new?").await;
    assert_eq!(exchange.context, "");
    assert_eq!(exchange.answer, "ANSWER[\n\nQuestion: Anything new?]");
}
