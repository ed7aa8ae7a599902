use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::PageDriver;

/// 一次审查使用的浏览器会话
///
/// 持有浏览器进程、CDP 事件处理任务和临时用户目录。
/// 正常路径调用 [`BrowserSession::shutdown`]；即使没有调用，
/// `Browser` 与 `TempDir` 的 Drop 也会结束进程并删除目录。
/// 字段按声明顺序析构，浏览器先于目录释放。
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    driver: PageDriver,
    profile_dir: TempDir,
}

impl BrowserSession {
    /// 启动无头浏览器并创建空白页面
    pub async fn launch(config: &Config) -> BrowserResult<Self> {
        info!("🚀 启动无头浏览器...");

        let profile_dir = tempfile::Builder::new()
            .prefix("focus-audit-profile-")
            .tempdir()
            .map_err(|source| BrowserError::ProfileDirFailed { source })?;
        debug!("临时用户目录: {}", profile_dir.path().display());

        let browser_config = build_browser_config(config, &profile_dir)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            log_launch_hints(&e.to_string(), config);
            BrowserError::launch_failed(e)
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建页面失败: {}", e);
                teardown(browser, handler, profile_dir).await;
                return Err(BrowserError::PageCreationFailed {
                    source: Box::new(e),
                });
            }
        };

        info!("✅ 浏览器已就绪");

        Ok(Self {
            browser,
            handler,
            driver: PageDriver::new(page, config.full_page_capture),
            profile_dir,
        })
    }

    /// 页面驱动
    pub fn driver(&self) -> &PageDriver {
        &self.driver
    }

    /// 关闭浏览器并删除临时用户目录
    pub async fn shutdown(self) {
        let Self {
            browser,
            handler,
            driver,
            profile_dir,
        } = self;
        drop(driver);
        teardown(browser, handler, profile_dir).await;
    }
}

async fn teardown(mut browser: Browser, handler: JoinHandle<()>, profile_dir: TempDir) {
    if let Err(e) = browser.close().await {
        warn!("关闭浏览器失败: {}", e);
    }
    if let Err(e) = browser.wait().await {
        warn!("等待浏览器进程退出失败: {}", e);
    }
    handler.abort();

    let path = profile_dir.path().display().to_string();
    match profile_dir.close() {
        Ok(()) => info!("🧹 已删除临时目录: {}", path),
        Err(e) => warn!("⚠️ 删除临时目录失败 ({}): {}", path, e),
    }
}

fn build_browser_config(config: &Config, profile_dir: &TempDir) -> BrowserResult<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .user_data_dir(profile_dir.path())
        .window_size(config.window_width, config.window_height)
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-extensions",
            "--disable-software-rasterizer",
            "--disable-infobars",
            "--disable-setuid-sandbox",
            "--no-first-run",
            "--no-default-browser-check",
            "--disable-background-networking",
            "--disable-prompt-on-repost",
            "--disable-sync",
        ]);

    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &config.chrome_executable {
        builder = builder.chrome_executable(executable);
    }

    builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        BrowserError::launch_failed(e)
    })
}

fn log_launch_hints(message: &str, config: &Config) {
    if !message.contains("DevToolsActivePort") {
        return;
    }
    warn!("DevToolsActivePort 错误排查:");
    warn!("1. 确认已安装 Chrome/Chromium 且可以执行");
    warn!("2. 检查是否有残留的 Chrome 进程 (pkill -f chrome)");
    match &config.chrome_executable {
        Some(path) => warn!("3. 确认 CHROME_BINARY_PATH 正确，当前: {}", path.display()),
        None => warn!("3. 当前为自动探测，可通过 CHROME_BINARY_PATH 指定浏览器路径"),
    }
}
