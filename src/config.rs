use anyhow::Result;
use serde::Deserialize;
use std::env;

use crate::preview::PreviewLimits;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub preview: PreviewLimits,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            preview: PreviewLimits {
                max_rows: env::var("PREVIEW_MAX_ROWS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                max_chars: env::var("PREVIEW_MAX_CHARS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
            },
            chat: ChatConfig {
                reply_delay_ms: env::var("CHAT_REPLY_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
            },
        })
    }
}
