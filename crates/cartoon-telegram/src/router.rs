use std::sync::Arc;

use teloxide::{
    dispatching::Dispatcher, dptree, error_handlers::LoggingErrorHandler, prelude::*,
    update_listeners::Polling,
};

use cartoon_core::{
    config::Config,
    domain::ChatId,
    errors::Error,
    messaging::port::MessagingPort,
    pipeline::CartoonPipeline,
    ports::{FileStorePort, TransformPort},
};

use crate::{files::TelegramFiles, handlers, TelegramMessenger};

pub struct AppState {
    pub cfg: Arc<Config>,
    pub pipeline: CartoonPipeline,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>, transform: Arc<dyn TransformPort>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        tracing::info!("@{} has been started", me.username());
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let files: Arc<dyn FileStorePort> = Arc::new(TelegramFiles::new(bot.clone()));
    let pipeline = CartoonPipeline::new(files, transform, messenger.clone());

    let state = Arc::new(AppState {
        cfg,
        pipeline,
        messenger,
    });

    let handler = Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| msg.photo().is_some())
                .endpoint(handlers::handle_photo),
        )
        .endpoint(handlers::handle_other);

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("update listener error"),
        )
        .await;

    Ok(())
}

/// Centralized fault boundary.
///
/// One fatal pipeline error in; one operator log line, one generic user
/// notice and one detailed operator forward out. If a delivery step fails,
/// handling of this update ends and the process keeps serving others.
pub async fn report_update_error(state: &AppState, chat_id: ChatId, err: Error) {
    tracing::error!(chat_id = chat_id.0, error = %err, "error handling update");

    if let Err(e) = state.messenger.send_text(chat_id, "Server error.").await {
        tracing::error!(error = %e, "failed to notify the chat about an error");
        return;
    }

    let Some(log_channel) = state.cfg.log_channel else {
        return;
    };

    let detail = format!(
        "Error handling update!\n<pre>error={}</pre>",
        escape_html(&err.to_string())
    );
    if let Err(e) = state
        .messenger
        .send_html(ChatId(log_channel), &detail)
        .await
    {
        tracing::error!(error = %e, "failed to forward the error to the log channel");
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use cartoon_core::{
        domain::{FileRef, MessageId, MessageRef},
        messaging::types::ChatAction,
        ports::{FileStorePort, TransformPort},
        Result as CoreResult,
    };

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Sent {
        Text(ChatId, String),
        Html(ChatId, String),
    }

    struct FakeMessenger {
        sent: Mutex<Vec<Sent>>,
        fail_text: bool,
    }

    impl FakeMessenger {
        fn new(fail_text: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_text,
            }
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        async fn send_text(&self, chat_id: ChatId, text: &str) -> CoreResult<MessageRef> {
            if self.fail_text {
                return Err(Error::External("telegram error: kicked".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Text(chat_id, text.to_string()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_html(&self, chat_id: ChatId, html: &str) -> CoreResult<MessageRef> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Html(chat_id, html.to_string()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_photo_url(&self, chat_id: ChatId, _url: &str) -> CoreResult<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> CoreResult<()> {
            Ok(())
        }
    }

    struct NoFiles;

    #[async_trait]
    impl FileStorePort for NoFiles {
        async fn fetch(&self, file: &FileRef) -> CoreResult<Vec<u8>> {
            Err(Error::NotFound(format!("file {:?} is gone", file.0)))
        }
    }

    struct NoTransform;

    #[async_trait]
    impl TransformPort for NoTransform {
        async fn transform(&self, _encoded_image: &str) -> CoreResult<Vec<String>> {
            Err(Error::Transport("unreachable in these tests".to_string()))
        }
    }

    fn state(log_channel: Option<i64>, fail_text: bool) -> (Arc<AppState>, Arc<FakeMessenger>) {
        let messenger = Arc::new(FakeMessenger::new(fail_text));
        let pipeline = CartoonPipeline::new(
            Arc::new(NoFiles),
            Arc::new(NoTransform),
            messenger.clone(),
        );
        let state = Arc::new(AppState {
            cfg: Arc::new(Config {
                bot_token: "123:abc".to_string(),
                log_channel,
            }),
            pipeline,
            messenger: messenger.clone(),
        });
        (state, messenger)
    }

    #[tokio::test]
    async fn fatal_error_notifies_chat_and_forwards_detail() {
        let (state, messenger) = state(Some(-100), false);

        report_update_error(
            &state,
            ChatId(7),
            Error::Decode("provider extra payload: expected value".to_string()),
        )
        .await;

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], Sent::Text(ChatId(7), "Server error.".to_string()));
        match &sent[1] {
            Sent::Html(chat, detail) => {
                assert_eq!(*chat, ChatId(-100));
                assert!(detail.contains("<pre>error=decode error:"));
            }
            other => panic!("expected operator forward, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_log_channel_means_no_operator_forward() {
        let (state, messenger) = state(None, false);

        report_update_error(&state, ChatId(7), Error::Transport("timed out".to_string())).await;

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(sent, [Sent::Text(ChatId(7), "Server error.".to_string())]);
    }

    #[tokio::test]
    async fn notify_failure_abandons_the_update() {
        let (state, messenger) = state(Some(-100), true);

        report_update_error(&state, ChatId(7), Error::Transport("timed out".to_string())).await;

        // The user notice failed, so nothing reaches the log channel either.
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn escapes_html_in_error_detail() {
        assert_eq!(
            escape_html("decode error: expected <value> at line 1 & column 2"),
            "decode error: expected &lt;value&gt; at line 1 &amp; column 2"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_html("Server error."), "Server error.");
    }
}
