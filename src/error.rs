use thiserror::Error;

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API call failed (model: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求构建失败
    #[error("failed to build LLM request: {source}")]
    RequestBuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM returned empty content (model: {model})")]
    EmptyContent { model: String },
}

/// 抽取流程错误
///
/// 消息会原样返回给调用方，所以使用英文
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 题目数量无法识别
    #[error("Could not detect number of questions in document (model said: {response})")]
    CountNotFound { response: String },
    /// 严格解析与宽松解析都失败
    #[error("Model response is not valid JSON: {strict}; lenient parse failed: {lenient}")]
    Unparseable { strict: String, lenient: String },
    /// 返回的 JSON 不是数组
    #[error("Model response is not a JSON array (got {found})")]
    NotAnArray { found: &'static str },
    /// 修复后仍缺少字段
    #[error("Question {index} is missing required field: {field}")]
    InvalidRecord { index: usize, field: &'static str },
    /// 字段存在但类型或内容不合法
    #[error("Question {index} has an invalid value for field: {field}")]
    InvalidField { index: usize, field: &'static str },
    /// 模型调用失败
    #[error(transparent)]
    Model(#[from] LlmError),
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 文件读写失败
    #[error("I/O failed ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化/反序列化失败
    #[error("JSON (de)serialization failed ({id}): {source}")]
    Serde {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    /// 标识符不合法
    #[error("invalid identifier: {id}")]
    InvalidId { id: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建 LLM API 调用错误
    pub fn api_failed(model: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// 创建请求构建错误
    pub fn build_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        LlmError::RequestBuildFailed {
            source: Box::new(source),
        }
    }
}

impl StorageError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serde(id: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Serde {
            id: id.into(),
            source,
        }
    }
}
