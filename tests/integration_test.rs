use focus_visible_audit::browser::BrowserSession;
use focus_visible_audit::config::Config;
use focus_visible_audit::orchestrator::traverse_page;
use focus_visible_audit::utils::logging;
use focus_visible_audit::App;

const TEST_PAGE: &str = "data:text/html,<a href='/one'>one</a><button id='b'>two</button><input id='c'>";

#[tokio::test]
#[ignore] // 需要本地 Chrome：cargo test -- --ignored
async fn test_traverse_real_page() {
    logging::init(true);

    let config = Config {
        llm_api_key: "unused".to_string(),
        ..Config::default()
    };

    let session = BrowserSession::launch(&config)
        .await
        .expect("启动浏览器失败");
    let records = traverse_page(session.driver(), TEST_PAGE, &config).await;
    session.shutdown().await;

    let records = records.expect("焦点遍历失败");
    assert_eq!(records.len(), 3, "三个可聚焦元素应各记录一次");
    assert_eq!(records[1].metadata.id.as_deref(), Some("b"));
}

#[tokio::test]
#[ignore] // 需要本地 Chrome 和 LLM_API_KEY
async fn test_full_audit() {
    logging::init(true);

    let config = Config::from_env().expect("加载配置失败");
    let report = App::new(config)
        .run("https://example.com")
        .await
        .expect("审计失败");

    assert_eq!(
        report.total_classified(),
        report.visible_count() + report.invisible_count()
    );
}
