//! Narration Context - Value Objects

use uuid::Uuid;

/// 语音标识（TTS 服务商定义的音色名，如 `fa-IR-DilaraNeural`）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoiceChoice(String);

impl VoiceChoice {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self(voice_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VoiceChoice {
    fn from(voice_id: &str) -> Self {
        Self(voice_id.to_string())
    }
}

/// 一次运行的唯一标识，用于临时目录和日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
