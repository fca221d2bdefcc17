use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::router::{self, TextOutcome, TextRequest};
use crate::sheets::SheetNotifier;
use crate::storage::{ReleaseStorage, RoleStorage};

use super::{ActionDialogue, HandlerResult};

/// Every non-command message lands here; the router decides what, if
/// anything, it completes.
pub(super) async fn on_text(
    bot: Bot,
    dialogue: ActionDialogue,
    msg: Message,
    roles: Arc<dyn RoleStorage>,
    releases: Arc<dyn ReleaseStorage>,
    notifier: Arc<dyn SheetNotifier>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let role = roles.get(user.id.0).await?;
    let pending = dialogue.get_or_default().await?;
    let request = TextRequest {
        text,
        username: user.username.as_deref(),
    };

    let outcome =
        router::route_text(&request, role, &pending, releases.as_ref(), notifier.as_ref()).await?;

    match outcome {
        TextOutcome::Ignored => {}
        TextOutcome::Reply { text, clear } => {
            bot.send_message(msg.chat.id, text).await?;
            if clear {
                dialogue.exit().await?;
            }
        }
        TextOutcome::ReplyAndNotifyArtist {
            text,
            artist,
            notification,
        } => {
            bot.send_message(msg.chat.id, text).await?;
            // The stored artist field is a display handle, not a chat id;
            // Telegram only resolves it for channels, so for ordinary users
            // this send fails. Log and move on, the status change itself is
            // already persisted.
            let recipient = Recipient::ChannelUsername(artist.clone());
            if let Err(err) = bot.send_message(recipient, notification).await {
                log::warn!("could not notify artist {artist}: {err}");
            }
            dialogue.exit().await?;
        }
    }

    Ok(())
}
