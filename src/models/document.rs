/// 上传的原始文档
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub const DEFAULT_MIME: &'static str = "application/pdf";

    pub fn new(filename: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_MIME.to_string()),
            bytes,
        }
    }

    /// 文档大小（KB），仅用于日志
    pub fn size_kb(&self) -> usize {
        self.bytes.len() / 1024
    }
}
