use std::sync::Arc;

use teloxide::prelude::*;

use cartoon_core::domain::ChatId;

use crate::router::{report_update_error, AppState};

/// Fallback for anything that is not a photo.
pub async fn handle_other(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);

    if let Err(e) = state.pipeline.handle_other(chat_id).await {
        report_update_error(&state, chat_id, e).await;
    }

    Ok(())
}
