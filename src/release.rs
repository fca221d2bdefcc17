use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of the bot a user talks to. Set once a role button is pressed,
/// persisted forever, overwritten by the latest press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Artist,
}

/// Release pipeline status. The wire/file representation is the exact Russian
/// wording the spreadsheet and the users expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseStatus {
    #[serde(rename = "В обработке")]
    Pending,
    #[serde(rename = "Одобрен и доставлен")]
    Approved,
}

impl ReleaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Pending => "В обработке",
            ReleaseStatus::Approved => "Одобрен и доставлен",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked release. The title is the map key in the release store, so it is
/// not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub artist: String,
    pub status: ReleaseStatus,
}
