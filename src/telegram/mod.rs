mod menu;
mod messages;

use std::sync::Arc;

use teloxide::dptree::{self, case};
use teloxide::{
    dispatching::dialogue, dispatching::dialogue::InMemStorage, macros::BotCommands, prelude::*,
};

use crate::router::{MenuAction, PendingAction};
use crate::sheets::SheetNotifier;
use crate::storage::{ReleaseStorage, RoleStorage};

type ActionDialogue = Dialogue<PendingAction, InMemStorage<PendingAction>>;
type HandlerResult = anyhow::Result<()>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
enum Command {
    #[command(description = "выбрать роль")]
    Start,
    #[command(description = "отменить текущее действие")]
    Cancel,
}

pub struct TelegramInteractionInterface;
impl TelegramInteractionInterface {
    pub async fn start(
        bot: Bot,
        roles: Arc<dyn RoleStorage>,
        releases: Arc<dyn ReleaseStorage>,
        notifier: Arc<dyn SheetNotifier>,
    ) {
        log::info!("Starting Telegram interaction interface");

        let command_handler = Update::filter_message().branch(
            teloxide::filter_command::<Command, _>()
                .branch(case![Command::Start].endpoint(menu::choose_role))
                .branch(case![Command::Cancel].endpoint(cancel)),
        );

        let menu_handler = Update::filter_callback_query()
            .filter_map(|query: CallbackQuery| {
                query
                    .data
                    .as_deref()
                    .and_then(|data| data.parse::<MenuAction>().ok())
            })
            .endpoint(menu::on_menu_button);

        let unknown_callback_handler = Update::filter_callback_query().endpoint(unknown_callback);

        let text_handler = Update::filter_message().endpoint(messages::on_text);

        let schema = dialogue::enter::<Update, InMemStorage<PendingAction>, PendingAction, _>()
            .branch(command_handler)
            .branch(menu_handler)
            .branch(unknown_callback_handler)
            .branch(text_handler);

        Dispatcher::builder(bot, schema)
            .dependencies(dptree::deps![
                InMemStorage::<PendingAction>::new(),
                roles,
                releases,
                notifier
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

async fn cancel(bot: Bot, dialogue: ActionDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Действие отменено.").await?;
    dialogue.exit().await?;
    Ok(())
}

// Stale keyboards can carry callback data no current button produces. Stop
// the client spinner and move on.
async fn unknown_callback(bot: Bot, query: CallbackQuery) -> HandlerResult {
    log::debug!("ignoring unknown callback data: {:?}", query.data);
    bot.answer_callback_query(query.id).await?;
    Ok(())
}
