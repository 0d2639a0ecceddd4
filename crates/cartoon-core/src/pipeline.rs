//! The photo-to-cartoon request pipeline.
//!
//! Coordinates fetch -> encode -> transform -> reply for a single update.
//! All collaborators sit behind ports, so the whole sequence runs against
//! in-memory fakes in tests.

use std::sync::Arc;

use base64::Engine;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ChatId, FileRef},
    errors::Error,
    messaging::{port::MessagingPort, types::ChatAction},
    ports::{FileStorePort, TransformPort},
    Result,
};

/// Static reply for anything that is not a photo.
pub const SEND_PHOTO_PROMPT: &str = "Send me a photo!";

pub struct CartoonPipeline {
    files: Arc<dyn FileStorePort>,
    transform: Arc<dyn TransformPort>,
    messenger: Arc<dyn MessagingPort>,
}

impl CartoonPipeline {
    pub fn new(
        files: Arc<dyn FileStorePort>,
        transform: Arc<dyn TransformPort>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            files,
            transform,
            messenger,
        }
    }

    /// Handle one photo update end to end.
    ///
    /// A provider rejection is a terminal-but-expected outcome: its message
    /// goes to the chat verbatim and the pipeline completes. Every other
    /// failure propagates to the caller's fault boundary.
    pub async fn handle_photo(&self, chat_id: ChatId, file: FileRef) -> Result<()> {
        // Best-effort "uploading a photo" indicator. Runs on its own task,
        // is cancelled unconditionally once the main sequence finishes, and
        // its failures are discarded.
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();
        {
            let messenger = self.messenger.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = messenger.send_chat_action(chat_id, ChatAction::UploadPhoto) => {}
                }
            });
        }

        // Without the source image nothing downstream can proceed.
        let bytes = self.files.fetch(&file).await?;
        tracing::debug!(bytes = bytes.len(), "fetched photo");

        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let urls = match self.transform.transform(&encoded).await {
            Ok(urls) => urls,
            Err(Error::Provider { message, .. }) => {
                self.messenger.send_text(chat_id, &message).await?;
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        // The provider contract leaves an empty list on success unspecified;
        // treat it as a broken envelope rather than silently doing nothing.
        let Some(first) = urls.first() else {
            return Err(Error::Decode(
                "provider returned success with no image urls".to_string(),
            ));
        };

        self.messenger.send_photo_url(chat_id, first).await?;
        Ok(())
    }

    /// Reply to any non-photo update with the static prompt.
    pub async fn handle_other(&self, chat_id: ChatId) -> Result<()> {
        self.messenger.send_text(chat_id, SEND_PHOTO_PROMPT).await?;
        Ok(())
    }
}
