mod appsettings;
mod release;
mod router;
mod sheets;
mod storage;
mod telegram;

use std::sync::Arc;

use teloxide::Bot;

use crate::sheets::{GoogleSheetNotifier, SheetNotifier};
use crate::storage::{JsonReleaseStorage, JsonRoleStorage, ReleaseStorage, RoleStorage};
use crate::telegram::TelegramInteractionInterface;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get();

    let bot = Bot::new(settings.telegram.token.clone());
    let roles: Arc<dyn RoleStorage> = Arc::new(JsonRoleStorage::new(&settings.storage.roles_file));
    let releases: Arc<dyn ReleaseStorage> =
        Arc::new(JsonReleaseStorage::new(&settings.storage.releases_file));
    let notifier: Arc<dyn SheetNotifier> =
        Arc::new(GoogleSheetNotifier::new(settings.sheets.webhook_url.clone()));

    TelegramInteractionInterface::start(bot, roles, releases, notifier).await
}
