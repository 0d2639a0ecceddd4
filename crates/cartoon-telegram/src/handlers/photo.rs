use std::sync::Arc;

use teloxide::prelude::*;

use cartoon_core::domain::{ChatId, FileRef};

use crate::router::{report_update_error, AppState};

pub async fn handle_photo(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(photos) = msg.photo() else {
        return Ok(());
    };
    // Telegram sends the photo in several sizes; the last is the largest.
    let Some(best) = photos.last() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let file = FileRef(best.file.id.clone());

    if let Err(e) = state.pipeline.handle_photo(chat_id, file).await {
        report_update_error(&state, chat_id, e).await;
    }

    Ok(())
}
