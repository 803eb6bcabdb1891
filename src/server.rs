//! # HTTP 服务
//!
//! 持有全局状态并按路由分发请求：
//!
//! | 请求 | 处理 |
//! |------|------|
//! | `OPTIONS *` | CORS 预检，200 |
//! | `* /api/analytics...` | `commands::analytics` |
//! | `POST /api/interpret` | `commands::interpret` |
//! | `GET *` | `commands::static_files` |
//! | 其他 | 404 `Not Found` |
//!
//! 每个连接在独立的 tokio 任务中以 HTTP/1 处理。

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http::{Method, Request, StatusCode};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::commands::{self, HttpResponse};
use crate::models::settings::AppConfig;
use crate::services::analytics::AnalyticsStore;
use crate::services::generation::{GenerationClient, HttpGenerationClient};
use crate::services::proxy::InterpretProxy;
use crate::services::storage::{AnalyticsBackend, JsonFileBackend};

const ANALYTICS_PREFIX: &str = "/api/analytics";
const INTERPRET_PATH: &str = "/api/interpret";

/// 服务的全局状态，启动时构建一次，在所有连接间共享
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analytics: AnalyticsStore,
    pub proxy: Arc<InterpretProxy>,
    protected_names: Arc<Vec<String>>,
}

impl AppState {
    /// 以给定的存储后端和生成客户端构建状态
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn AnalyticsBackend>,
        client: Arc<dyn GenerationClient>,
    ) -> Self {
        let proxy = Arc::new(InterpretProxy::new(&config, client));
        let protected_names = Arc::new(config.protected_names());
        Self {
            config: Arc::new(config),
            analytics: AnalyticsStore::new(backend),
            proxy,
            protected_names,
        }
    }

    /// 生产配置：JSON 文件存储 + 真实的生成 API 客户端
    pub fn from_config(config: AppConfig) -> Self {
        let backend = Arc::new(JsonFileBackend::new(config.analytics_file.clone()));
        let client = Arc::new(HttpGenerationClient::new(config.upstream_base.clone()));
        Self::new(config, backend, client)
    }
}

/// 路由一个请求
///
/// 对请求体类型泛型，生产环境中为 `hyper::body::Incoming`，测试中为 `Full<Bytes>`。
pub async fn handle<B>(state: &AppState, req: Request<B>) -> HttpResponse
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    log::debug!("{} {}", method, path);

    if method == Method::OPTIONS {
        return commands::preflight();
    }

    if path.starts_with(ANALYTICS_PREFIX) {
        return commands::analytics::handle(&state.analytics, &method, &path, req.into_body())
            .await;
    }

    if method == Method::POST && path == INTERPRET_PATH {
        return commands::interpret::handle(&state.proxy, req.into_body()).await;
    }

    if method == Method::GET {
        return commands::static_files::serve(&state.config.static_root, &path, &state.protected_names)
            .await;
    }

    commands::text(StatusCode::NOT_FOUND, "Not Found")
}

/// 监听端口并处理连接，直到进程退出
///
/// # 错误
/// 端口绑定失败时返回错误
pub async fn run(state: AppState) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = TcpListener::bind(addr).await?;

    log_banner(&state.config);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("接受连接失败: {}", e);
                continue;
            }
        };

        let state = state.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { Ok::<_, Infallible>(handle(&state, req).await) }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                log::debug!("连接 {} 处理结束: {}", peer, e);
            }
        });
    }
}

fn log_banner(config: &AppConfig) {
    let key_status = if config.has_api_key() {
        "已配置 ✓"
    } else {
        "未配置 ✗"
    };
    log::info!("阿莲读经典 - 服务器启动");
    log::info!("地址: http://localhost:{}", config.port);
    log::info!(
        "数据面板: http://localhost:{}/api/analytics/dashboard",
        config.port
    );
    log::info!("API Key: {}", key_status);
    log::info!("模型: {}", config.model);
}
