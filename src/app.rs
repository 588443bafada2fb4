use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::api::{self, AppState};
use crate::clients::{DocumentModel, LlmClient};
use crate::config::Config;
use crate::services::{ExtractionService, TopicService};
use crate::storage::{AnalysisRepository, FileStore, QuizRepository};
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用：创建存储目录、LLM 客户端和路由
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let quiz_store = FileStore::open(&config.quizzes_dir)
            .await
            .context("无法创建试卷目录")?;
        let analysis_store = FileStore::open(&config.analyses_dir)
            .await
            .context("无法创建分析目录")?;

        let model: Arc<dyn DocumentModel> = Arc::new(LlmClient::new(&config));
        let state = build_state(
            model,
            QuizRepository::new(Arc::new(quiz_store)),
            AnalysisRepository::new(Arc::new(analysis_store)),
            config.split_threshold,
        );

        let router = api::router(state, config.max_upload_bytes, config.static_dir.as_deref());

        Ok(Self { config, router })
    }

    /// 启动 HTTP 服务，直到进程退出
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("无法绑定地址 {addr}"))?;

        info!("✓ Databoy 正在运行: http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

/// 组装处理器共享的上下文
pub fn build_state(
    model: Arc<dyn DocumentModel>,
    quizzes: QuizRepository,
    analyses: AnalysisRepository,
    split_threshold: usize,
) -> AppState {
    AppState {
        model_name: model.model_name().to_string(),
        extraction: Arc::new(ExtractionService::new(model.clone(), split_threshold)),
        topics: Arc::new(TopicService::new(model)),
        quizzes,
        analyses,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭...");
}
