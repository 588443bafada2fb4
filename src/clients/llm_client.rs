//! LLM 客户端 - 模型调用边界
//!
//! 只负责"给定提示词和可选文档，返回文本"这一能力
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）
//! - 文档以 base64 data URL 的形式内联发送：图片用 `image_url`，其他（如 PDF）用 `file`

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartFile,
        ChatCompletionRequestMessageContentPartImage, ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, FileObject, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use base64::Engine;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::models::Document;

/// 单次生成的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// 题目计数：只需要一个整数
    pub const COUNT: Self = Self {
        temperature: 0.0,
        max_output_tokens: 256,
    };

    /// 题目抽取：完整 JSON 数组
    pub const EXTRACTION: Self = Self {
        temperature: 0.0,
        max_output_tokens: 8192,
    };

    /// 主题抽取
    pub const TOPICS: Self = Self {
        temperature: 0.1,
        max_output_tokens: 2048,
    };
}

/// 模型调用能力
///
/// 测试里用脚本化的实现替换，真实环境使用 [`LlmClient`]
#[async_trait]
pub trait DocumentModel: Send + Sync {
    /// 模型名称（用于健康检查和日志）
    fn model_name(&self) -> &str;

    /// 发送提示词（以及可选的文档），返回模型的原始文本
    async fn generate(
        &self,
        prompt: &str,
        document: Option<&Document>,
        params: GenerationParams,
    ) -> Result<String, LlmError>;
}

/// OpenAI 兼容的 LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_user_message(
        prompt: &str,
        document: Option<&Document>,
    ) -> Result<ChatCompletionRequestMessage, LlmError> {
        let message = match document {
            Some(doc) => {
                let content_parts = vec![
                    ChatCompletionRequestUserMessageContentPart::Text(
                        ChatCompletionRequestMessageContentPartText {
                            text: prompt.to_string(),
                        },
                    ),
                    document_part(doc)?,
                ];

                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
                    .build()
                    .map_err(LlmError::build_failed)?
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(LlmError::build_failed)?,
        };

        Ok(ChatCompletionRequestMessage::User(message))
    }
}

#[async_trait]
impl DocumentModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        document: Option<&Document>,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());
        if let Some(doc) = document {
            debug!("附带文档 {} ({} KB, {})", doc.filename, doc.size_kb(), doc.mime_type);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![Self::build_user_message(prompt, document)?])
            .temperature(params.temperature)
            .max_tokens(params.max_output_tokens)
            .build()
            .map_err(LlmError::build_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// 图片走 `image_url`，其他文档走 `file`
fn document_part(doc: &Document) -> Result<ChatCompletionRequestUserMessageContentPart, LlmError> {
    if doc.mime_type.starts_with("image/") {
        return Ok(ChatCompletionRequestUserMessageContentPart::ImageUrl(
            ChatCompletionRequestMessageContentPartImage {
                image_url: ImageUrl {
                    url: data_url(doc),
                    detail: Some(ImageDetail::High),
                },
            },
        ));
    }

    // FileObject 的字段不公开，只能通过反序列化构造
    let file: FileObject = serde_json::from_value(serde_json::json!({
        "file_data": data_url(doc),
        "filename": doc.filename,
    }))
    .map_err(LlmError::build_failed)?;

    Ok(ChatCompletionRequestUserMessageContentPart::File(
        ChatCompletionRequestMessageContentPartFile { file },
    ))
}

/// 把文档编码成 data URL
fn data_url(doc: &Document) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&doc.bytes);
    format!("data:{};base64,{}", doc.mime_type, encoded)
}
