use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::release::Role;
use crate::router::{self, MenuAction, MenuOutcome};
use crate::storage::RoleStorage;

use super::{ActionDialogue, HandlerResult};

fn action_button(label: &str, action: MenuAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.as_callback_data())
}

fn role_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![action_button("Я менеджер", MenuAction::SetRoleManager)],
        vec![action_button("Я артист", MenuAction::SetRoleArtist)],
    ])
}

fn manager_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![action_button("➕ Добавить релиз", MenuAction::AddRelease)],
        vec![action_button("🔍 Проверить статус", MenuAction::CheckStatus)],
        vec![action_button(
            "Обновить статус: Одобрен и доставлен",
            MenuAction::ApproveRelease,
        )],
    ])
}

fn artist_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![action_button(
            "🔍 Проверить статус релиза",
            MenuAction::ArtistCheckStatus,
        )],
        vec![action_button("Сообщить о проблеме", MenuAction::ReportIssue)],
    ])
}

pub(super) async fn choose_role(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Кто вы?")
        .reply_markup(role_keyboard())
        .await?;
    Ok(())
}

pub(super) async fn on_menu_button(
    bot: Bot,
    dialogue: ActionDialogue,
    action: MenuAction,
    query: CallbackQuery,
    roles: Arc<dyn RoleStorage>,
) -> HandlerResult {
    bot.answer_callback_query(query.id).await?;

    match router::route_menu_action(action, query.from.id.0, roles.as_ref()).await? {
        MenuOutcome::ShowMenu(Role::Manager) => {
            bot.send_message(dialogue.chat_id(), "Меню менеджера:")
                .reply_markup(manager_keyboard())
                .await?;
        }
        MenuOutcome::ShowMenu(Role::Artist) => {
            bot.send_message(dialogue.chat_id(), "Меню артиста:")
                .reply_markup(artist_keyboard())
                .await?;
        }
        MenuOutcome::Prompt { text, pending } => {
            bot.send_message(dialogue.chat_id(), text).await?;
            dialogue.update(pending).await?;
        }
    }

    Ok(())
}
