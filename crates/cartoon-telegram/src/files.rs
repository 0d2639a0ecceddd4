//! Telegram file storage fetcher.
//!
//! Resolves a file id via `getFile`, then downloads the bytes from the Bot
//! API file endpoint with a single GET.

use async_trait::async_trait;

use teloxide::prelude::*;

use cartoon_core::{domain::FileRef, errors::Error, ports::FileStorePort, Result};

pub struct TelegramFiles {
    bot: Bot,
    http: reqwest::Client,
}

impl TelegramFiles {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }

    fn download_url(&self, file_path: &str) -> Result<url::Url> {
        self.bot
            .api_url()
            .join(&format!("file/bot{}/{}", self.bot.token(), file_path))
            .map_err(|e| Error::External(format!("file url: {e}")))
    }

    /// The bot token is part of the download URL and transport errors love
    /// to echo URLs. Keep it out of anything that reaches logs or chats.
    fn redact(&self, s: &str) -> String {
        s.replace(self.bot.token(), "<token>")
    }
}

#[async_trait]
impl FileStorePort for TelegramFiles {
    async fn fetch(&self, file: &FileRef) -> Result<Vec<u8>> {
        let meta = self
            .bot
            .get_file(file.0.clone())
            .await
            .map_err(|e| Error::Transport(format!("getFile failed: {e}")))?;

        let url = self.download_url(&meta.path)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(self.redact(&format!("file download failed: {e}"))))?;

        match resp.status() {
            reqwest::StatusCode::OK => {}
            reqwest::StatusCode::NOT_FOUND => {
                return Err(Error::NotFound(format!(
                    "file {:?} is gone from bot storage",
                    file.0
                )))
            }
            status => {
                return Err(Error::Transport(format!(
                    "file download returned status {status}"
                )))
            }
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(self.redact(&format!("file download read failed: {e}"))))?;

        Ok(bytes.to_vec())
    }
}
