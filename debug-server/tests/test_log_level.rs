use debug_server::{run, LevelSink, ReconfigurableLevel, ServerHandle};
use log::LevelFilter;
use reqwest::{Client, StatusCode};

async fn start(initial: LevelFilter) -> (ServerHandle, ReconfigurableLevel, String) {
    let level = ReconfigurableLevel::new(initial);
    let server = run("127.0.0.1:0", level.clone()).await.expect("Failed to start debug server");
    let url = format!("http://{}/log-level", server.local_addr());
    (server, level, url)
}

async fn read(client: &Client, url: &str) -> String {
    client.get(url).send().await.unwrap().text().await.unwrap()
}

#[tokio::test]
async fn test_get_reports_current_level() {
    let (server, level, url) = start(LevelFilter::Warn).await;
    let client = Client::new();

    assert_eq!(read(&client, &url).await, "warn\n");

    level.set_min_level(LevelFilter::Trace);
    assert_eq!(read(&client, &url).await, "trace\n");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_put_changes_level() {
    let (server, level, url) = start(LevelFilter::Info).await;
    let client = Client::new();

    let response = client.put(&url).body("debug").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "log level set to debug\n");

    assert_eq!(level.min_level(), LevelFilter::Debug);
    assert_eq!(read(&client, &url).await, "debug\n");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_post_accepts_aliases() {
    let (server, level, url) = start(LevelFilter::Info).await;
    let client = Client::new();

    let response = client.post(&url).body("E\n").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(level.min_level(), LevelFilter::Error);

    let response = client.post(&url).body("0").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read(&client, &url).await, "off\n");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_level_leaves_sink_unchanged() {
    let (server, level, url) = start(LevelFilter::Info).await;
    let client = Client::new();

    let response = client.put(&url).body("verbose").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "invalid log level: verbose\n");

    assert_eq!(level.min_level(), LevelFilter::Info);
    assert_eq!(read(&client, &url).await, "info\n");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_write_reads() {
    let (server, level, url) = start(LevelFilter::Debug).await;
    let client = Client::new();

    let response = client.put(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "debug\n");
    assert_eq!(level.min_level(), LevelFilter::Debug);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let (server, _, url) = start(LevelFilter::Info).await;

    let response = Client::new().delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_writes_settle_on_a_valid_level() {
    let (server, level, url) = start(LevelFilter::Info).await;
    let client = Client::new();

    let writes = ["error", "warn", "debug", "trace"].map(|name| {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move { client.put(&url).body(name).send().await.unwrap().status() })
    });
    for write in writes {
        assert_eq!(write.await.unwrap(), StatusCode::OK);
    }

    let settled = level.min_level();
    assert!(matches!(
        settled,
        LevelFilter::Error | LevelFilter::Warn | LevelFilter::Debug | LevelFilter::Trace
    ));
    assert_eq!(read(&client, &url).await, format!("{}\n", settled.as_str().to_lowercase()));

    server.shutdown().await.unwrap();
}
