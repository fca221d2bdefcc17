use std::str::FromStr;

use crate::release::{Release, ReleaseStatus, Role};
use crate::sheets::SheetNotifier;
use crate::storage::{ReleaseStorage, RoleStorage};

/// A pressed menu button, parsed from the callback data. Unknown callback
/// data never reaches the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SetRoleManager,
    SetRoleArtist,
    AddRelease,
    CheckStatus,
    ApproveRelease,
    ArtistCheckStatus,
    ReportIssue,
}

impl MenuAction {
    /// The wire identifier carried in the inline keyboard callback data.
    pub fn as_callback_data(&self) -> &'static str {
        match self {
            MenuAction::SetRoleManager => "set_role_manager",
            MenuAction::SetRoleArtist => "set_role_artist",
            MenuAction::AddRelease => "manager_add_release",
            MenuAction::CheckStatus => "manager_check_status",
            MenuAction::ApproveRelease => "step_approved",
            MenuAction::ArtistCheckStatus => "artist_check_status",
            MenuAction::ReportIssue => "artist_report_issue",
        }
    }
}

impl FromStr for MenuAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set_role_manager" => Ok(MenuAction::SetRoleManager),
            "set_role_artist" => Ok(MenuAction::SetRoleArtist),
            "manager_add_release" => Ok(MenuAction::AddRelease),
            "manager_check_status" => Ok(MenuAction::CheckStatus),
            "step_approved" => Ok(MenuAction::ApproveRelease),
            "artist_check_status" => Ok(MenuAction::ArtistCheckStatus),
            "artist_report_issue" => Ok(MenuAction::ReportIssue),
            other => anyhow::bail!("unknown menu action '{other}'"),
        }
    }
}

/// What the next free-text message from a chat should complete. Lives in the
/// per-chat dialogue storage, so it does not survive a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingAction {
    #[default]
    Idle,
    AddRelease,
    CheckStatus,
    ApproveRelease,
    ArtistCheckStatus,
    ReportIssue,
}

pub enum MenuOutcome {
    /// The user picked a role; show them the matching menu.
    ShowMenu(Role),
    /// Ask for the next text message and remember what it is for.
    Prompt {
        text: &'static str,
        pending: PendingAction,
    },
}

/// Routes a menu button press. Role buttons persist the choice immediately;
/// the rest only arm a pending action. The stored role is deliberately not
/// checked here: whoever presses a button gets its prompt.
pub async fn route_menu_action(
    action: MenuAction,
    user_id: u64,
    roles: &dyn RoleStorage,
) -> anyhow::Result<MenuOutcome> {
    match action {
        MenuAction::SetRoleManager => {
            roles.set(user_id, Role::Manager).await?;
            Ok(MenuOutcome::ShowMenu(Role::Manager))
        }
        MenuAction::SetRoleArtist => {
            roles.set(user_id, Role::Artist).await?;
            Ok(MenuOutcome::ShowMenu(Role::Artist))
        }
        MenuAction::AddRelease => Ok(MenuOutcome::Prompt {
            text: "Введите название релиза и @артиста через пробел:",
            pending: PendingAction::AddRelease,
        }),
        MenuAction::CheckStatus => Ok(MenuOutcome::Prompt {
            text: "Введите название релиза для проверки:",
            pending: PendingAction::CheckStatus,
        }),
        MenuAction::ApproveRelease => Ok(MenuOutcome::Prompt {
            text: "Введите название релиза, чтобы установить статус 'Одобрен и доставлен':",
            pending: PendingAction::ApproveRelease,
        }),
        MenuAction::ArtistCheckStatus => Ok(MenuOutcome::Prompt {
            text: "Введите название своего релиза:",
            pending: PendingAction::ArtistCheckStatus,
        }),
        MenuAction::ReportIssue => Ok(MenuOutcome::Prompt {
            text: "Опишите проблему и укажите название релиза:",
            pending: PendingAction::ReportIssue,
        }),
    }
}

/// The free-text message completing a pending action, plus who sent it.
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub username: Option<&'a str>,
}

pub enum TextOutcome {
    /// No stored role or nothing pending: say nothing, change nothing.
    Ignored,
    Reply {
        text: String,
        /// `false` keeps the pending action armed so the user can retry from
        /// the same prompt.
        clear: bool,
    },
    /// Reply to the sender and additionally try to message the release's
    /// artist. Always clears the pending action.
    ReplyAndNotifyArtist {
        text: String,
        artist: String,
        notification: String,
    },
}

/// Routes a text message by (stored role, pending action). Every branch
/// clears the pending action except the add-release format error, which keeps
/// the user in the prompt.
pub async fn route_text(
    request: &TextRequest<'_>,
    role: Option<Role>,
    pending: &PendingAction,
    releases: &dyn ReleaseStorage,
    notifier: &dyn SheetNotifier,
) -> anyhow::Result<TextOutcome> {
    match (role, pending) {
        (Some(Role::Manager), PendingAction::AddRelease) => {
            add_release(request, releases, notifier).await
        }
        (Some(Role::Manager), PendingAction::CheckStatus) => check_status(request, releases).await,
        (Some(Role::Manager), PendingAction::ApproveRelease) => {
            approve_release(request, releases).await
        }
        (Some(Role::Artist), PendingAction::ArtistCheckStatus) => {
            artist_check_status(request, releases).await
        }
        (Some(Role::Artist), PendingAction::ReportIssue) => report_issue(request, notifier).await,
        _ => Ok(TextOutcome::Ignored),
    }
}

async fn add_release(
    request: &TextRequest<'_>,
    releases: &dyn ReleaseStorage,
    notifier: &dyn SheetNotifier,
) -> anyhow::Result<TextOutcome> {
    let parts: Vec<&str> = request.text.split_whitespace().collect();
    if parts.len() != 2 {
        return Ok(TextOutcome::Reply {
            text: "Введите в формате: Название @артист".to_string(),
            clear: false,
        });
    }
    let (title, artist) = (parts[0], parts[1]);

    releases
        .upsert(
            title,
            Release {
                artist: artist.to_string(),
                status: ReleaseStatus::Pending,
            },
        )
        .await?;
    notifier
        .report_release(title, artist, ReleaseStatus::Pending)
        .await;

    Ok(TextOutcome::Reply {
        text: format!("Релиз '{title}' добавлен."),
        clear: true,
    })
}

async fn check_status(
    request: &TextRequest<'_>,
    releases: &dyn ReleaseStorage,
) -> anyhow::Result<TextOutcome> {
    let title = request.text.trim();
    let text = match releases.get(title).await? {
        Some(release) => format!("Статус релиза '{title}': {}", release.status),
        None => "Релиз не найден.".to_string(),
    };
    Ok(TextOutcome::Reply { text, clear: true })
}

async fn approve_release(
    request: &TextRequest<'_>,
    releases: &dyn ReleaseStorage,
) -> anyhow::Result<TextOutcome> {
    let title = request.text.trim();
    match releases.set_status(title, ReleaseStatus::Approved).await? {
        Some(release) => Ok(TextOutcome::ReplyAndNotifyArtist {
            text: format!("Статус обновлён для '{title}': Одобрен и доставлен"),
            artist: release.artist,
            notification: format!("✅ Ваш релиз '{title}' получил статус: Одобрен и доставлен"),
        }),
        None => Ok(TextOutcome::Reply {
            text: "Релиз не найден.".to_string(),
            clear: true,
        }),
    }
}

async fn artist_check_status(
    request: &TextRequest<'_>,
    releases: &dyn ReleaseStorage,
) -> anyhow::Result<TextOutcome> {
    let title = request.text.trim();
    // A missing release and a foreign release get the same denial, so an
    // artist cannot probe which titles exist.
    let text = match (releases.get(title).await?, request.username) {
        (Some(release), Some(username)) if release.artist == format!("@{username}") => {
            format!("Статус релиза '{title}': {}", release.status)
        }
        _ => "Вы не являетесь владельцем этого релиза.".to_string(),
    };
    Ok(TextOutcome::Reply { text, clear: true })
}

async fn report_issue(
    request: &TextRequest<'_>,
    notifier: &dyn SheetNotifier,
) -> anyhow::Result<TextOutcome> {
    let issue = request.text.trim();
    let username = request.username.unwrap_or("Неизвестный пользователь");
    // The release title is taken on faith as the first word of the report.
    let title = issue.split_whitespace().next().unwrap_or("Не указано");

    notifier.report_issue(title, username, issue).await;

    Ok(TextOutcome::Reply {
        text: "Спасибо, проблема отправлена менеджеру!".to_string(),
        clear: true,
    })
}
