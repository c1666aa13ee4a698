use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use taxlaw::api::{ClientConfig, EgovClient, LawSource};
use taxlaw::config::DownloadConfig;
use taxlaw::download::{Downloader, FixedDelay, LawOutcome};
use taxlaw::error::TaxlawError;

fn client(server: &ServerGuard) -> EgovClient {
    EgovClient::new(&ClientConfig {
        base_url: server.url(),
        timeout: 5,
        ..Default::default()
    })
    .unwrap()
}

fn download_config(server: &ServerGuard, dir: &Path, sleep: Duration, limit: Option<usize>) -> DownloadConfig {
    DownloadConfig {
        output_dir: dir.to_path_buf(),
        base_url: server.url(),
        sleep,
        limit,
        timeout: 5,
        ..Default::default()
    }
}

async fn mock_list(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", "/laws")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("category_cd".to_string(), "13".to_string()),
            Matcher::UrlEncoded("response_format".to_string(), "json".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_law(
    server: &mut ServerGuard,
    key: &str,
    status: usize,
    body: &str,
    hits: usize,
) -> mockito::Mock {
    server
        .mock("GET", format!("/law_data/{}", key).as_str())
        .match_query(Matcher::UrlEncoded(
            "law_full_text_format".to_string(),
            "json".to_string(),
        ))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn test_list_laws_parses_flat_and_nested_entries() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({
            "total_count": 3,
            "count": 3,
            "law_info_list": [
                {"law_id": "A1", "law_num": "N1", "law_name": "Tax Act"},
                {
                    "law_info": {"law_id": "340AC0000000033", "law_num": "昭和四十年法律第三十三号"},
                    "revision_info": {"law_title": "所得税法"}
                },
                {"law_num": "N3", "law_name": "No identifier"}
            ]
        }),
    )
    .await;

    let list = client(&server).list_laws("13").await.unwrap();

    assert_eq!(list.total_count, Some(3));
    assert_eq!(list.dropped, 1);
    assert_eq!(list.laws.len(), 2);
    assert_eq!(list.laws[0].law_id, "A1");
    assert_eq!(list.laws[1].law_name.as_deref(), Some("所得税法"));
    assert!(list.laws.iter().all(|law| law.category_cd == "13"));
}

#[tokio::test]
async fn test_odd_list_entries_do_not_abort_run() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"law_info_list": [
            {"law_id": "A1", "lawId": "A1", "law_num": "N1", "law_name": "Both Spellings"},
            {"law_id": "A2", "law_num": 33, "law_name": "Numeric Number"},
            "not an entry",
            {"law_id": {"nested": "A3"}}
        ]}),
    )
    .await;
    let first = mock_law(&mut server, "A1", 200, r#"{"n": 1}"#, 1).await;
    let second = mock_law(&mut server, "A2", 200, r#"{"n": 2}"#, 1).await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let report = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(report.saved_count(), 2);
    assert_eq!(report.dropped, 2);
    assert!(dir.path().join("N1_Both_Spellings.json").exists());
    assert!(dir.path().join("33_Numeric_Number.json").exists());
}

#[tokio::test]
async fn test_list_laws_unwraps_laws_response_envelope() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"laws_response": {
            "total_count": "1",
            "law_info_list": [{"law_id": "A1", "law_num": "N1"}]
        }}),
    )
    .await;

    let list = client(&server).list_laws("13").await.unwrap();

    assert_eq!(list.total_count, Some(1));
    assert_eq!(list.laws.len(), 1);
    assert_eq!(list.laws[0].law_id, "A1");
    assert_eq!(list.laws[0].law_num.as_deref(), Some("N1"));
}

#[tokio::test]
async fn test_list_laws_rejects_malformed_json() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/laws")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let result = client(&server).list_laws("13").await;
    assert!(matches!(result, Err(TaxlawError::Parse(_))));
}

#[tokio::test]
async fn test_list_laws_requires_law_info_list() {
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!({"total_count": 0})).await;

    let result = client(&server).list_laws("13").await;
    assert!(matches!(result, Err(TaxlawError::Parse(_))));
}

#[tokio::test]
async fn test_list_failure_aborts_run() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/laws")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let details = server
        .mock("GET", Matcher::Regex("^/law_data/".to_string()))
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let result = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await;

    match result {
        Err(TaxlawError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
    details.assert_async().await;
}

#[tokio::test]
async fn test_fallback_to_law_number_writes_file() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"law_info_list": [{"law_id": "A1", "law_num": "321AC0000000033", "law_name": "Tax Act"}]}),
    )
    .await;
    let by_id = mock_law(&mut server, "A1", 404, r#"{"message": "not found"}"#, 1).await;
    let by_num = mock_law(&mut server, "321AC0000000033", 200, r#"{"text": "..."}"#, 1).await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let report = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();

    by_id.assert_async().await;
    by_num.assert_async().await;
    assert_eq!(report.saved_count(), 1);
    assert_eq!(report.fallback_count(), 1);

    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec!["321AC0000000033_Tax_Act.json".to_string()]);

    let written: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("321AC0000000033_Tax_Act.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written, json!({"text": "..."}));
}

#[tokio::test]
async fn test_404_without_law_number_is_terminal() {
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!({"law_info_list": [{"law_id": "A1"}]})).await;
    let by_id = mock_law(&mut server, "A1", 404, "{}", 1).await;
    let others = server
        .mock("GET", Matcher::Regex("^/law_data/[^A]".to_string()))
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let report = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();

    by_id.assert_async().await;
    others.assert_async().await;
    assert_eq!(report.failed_count(), 1);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_server_error_is_skipped_without_fallback() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"law_info_list": [
            {"law_id": "A1", "law_num": "N1", "law_name": "Broken"},
            {"law_id": "A2", "law_num": "N2", "law_name": "Fine"}
        ]}),
    )
    .await;
    let broken = mock_law(&mut server, "A1", 500, "oops", 1).await;
    let fallback = mock_law(&mut server, "N1", 200, "{}", 0).await;
    let fine = mock_law(&mut server, "A2", 200, r#"{"ok": true}"#, 1).await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let report = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();

    broken.assert_async().await;
    fallback.assert_async().await;
    fine.assert_async().await;
    assert_eq!(report.failed_count(), 1);
    assert!(dir.path().join("N2_Fine.json").exists());
}

#[tokio::test]
async fn test_malformed_detail_is_skipped() {
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!({"law_info_list": [{"law_id": "A1", "law_num": "N1"}]})).await;
    let _detail = mock_law(&mut server, "A1", 200, "{not json", 1).await;

    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    let report = Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();

    match &report.records[0].outcome {
        LawOutcome::Failed { error: TaxlawError::Parse(_) } => (),
        other => panic!("Expected parse failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_limit_and_throttle() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"law_info_list": [
            {"law_id": "A1", "law_name": "One"},
            {"law_id": "A2", "law_name": "Two"},
            {"law_id": "A3", "law_name": "Three"},
            {"law_id": "A4", "law_name": "Four"}
        ]}),
    )
    .await;
    let first = mock_law(&mut server, "A1", 200, "{}", 1).await;
    let second = mock_law(&mut server, "A2", 200, "{}", 1).await;
    let third = mock_law(&mut server, "A3", 200, "{}", 1).await;
    let fourth = mock_law(&mut server, "A4", 200, "{}", 0).await;

    let sleep = Duration::from_millis(40);
    let dir = TempDir::new().unwrap();
    let config = download_config(&server, dir.path(), sleep, Some(3));

    let started = Instant::now();
    let report = Downloader::new(client(&server), FixedDelay::new(sleep), config)
        .run()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
    fourth.assert_async().await;
    assert_eq!(report.total(), 3);
    assert!(elapsed >= sleep * 2, "elapsed {:?} shorter than two pauses", elapsed);
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let mut server = Server::new_async().await;
    let _list = mock_list(
        &mut server,
        json!({"law_info_list": [{"law_id": "Z9", "law_num": "", "law_name": ""}]}),
    )
    .await;
    let detail = mock_law(
        &mut server,
        "Z9",
        200,
        r#"{"law_full_text": {"tag": "Law", "children": ["所得税法"]}, "attached_files_info": null}"#,
        2,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Z9_Z9.json");

    let config = download_config(&server, dir.path(), Duration::ZERO, None);
    Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config.clone())
        .run()
        .await
        .unwrap();
    let first = fs::read(&path).unwrap();

    Downloader::new(client(&server), FixedDelay::new(Duration::ZERO), config)
        .run()
        .await
        .unwrap();
    let second = fs::read(&path).unwrap();

    detail.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert!(String::from_utf8(first).unwrap().contains("所得税法"));
}
