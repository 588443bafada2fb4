use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::services::extraction_service::DEFAULT_SPLIT_THRESHOLD;

/// 默认的 OpenAI 兼容端点（Gemini）
pub const DEFAULT_LLM_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_LLM_MODEL_NAME: &str = "gemini-2.5-flash";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 服务配置 ---
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 试卷 JSON 存放目录
    pub quizzes_dir: PathBuf,
    /// 主题分析结果存放目录
    pub analyses_dir: PathBuf,
    /// 超过该题目数量时拆成两次抽取
    pub split_threshold: usize,
    /// 请求体大小上限（字节）
    pub max_upload_bytes: usize,
    /// 静态文件目录（可选）
    pub static_dir: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: DEFAULT_LLM_API_BASE_URL.to_string(),
            llm_model_name: DEFAULT_LLM_MODEL_NAME.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            quizzes_dir: PathBuf::from("quizzes"),
            analyses_dir: PathBuf::from("d3_analyses"),
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            max_upload_bytes: 50 * 1024 * 1024,
            static_dir: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（先尝试读取 `.env`）
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let llm_api_key = lookup("LLM_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            })?;

        Ok(Self {
            llm_api_key,
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            host: lookup("HOST").unwrap_or(default.host),
            port: parse_var(&lookup, "PORT", "u16")?.unwrap_or(default.port),
            quizzes_dir: lookup("QUIZZES_DIR").map(PathBuf::from).unwrap_or(default.quizzes_dir),
            analyses_dir: lookup("ANALYSES_DIR").map(PathBuf::from).unwrap_or(default.analyses_dir),
            split_threshold: parse_var(&lookup, "SPLIT_THRESHOLD", "usize")?.unwrap_or(default.split_threshold),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", "usize")?.unwrap_or(default.max_upload_bytes),
            static_dir: lookup("STATIC_DIR").filter(|v| !v.is_empty()).map(PathBuf::from),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        })
    }

    /// 监听地址
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value.parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: "HOST".to_string(),
            value,
            expected_type: "socket address".to_string(),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
