//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Symbolic icon reference; rendering surfaces map these to glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconRef {
    /// Dashboard tile grid.
    Dashboard,
    /// Clipboard with a task list.
    Assignment,
    /// Calculator.
    Calculate,
    /// Person silhouette used on the profile button.
    Person,
    /// Phone book entry.
    ContactPhone,
    /// Document page.
    Description,
    /// Play button in a circle.
    PlayCircle,
    /// Close cross.
    Close,
}

impl IconRef {
    /// Stable snake_case name, used in logs and configuration.
    pub fn name(self) -> &'static str {
        match self {
            IconRef::Dashboard => "dashboard",
            IconRef::Assignment => "assignment",
            IconRef::Calculate => "calculate",
            IconRef::Person => "person",
            IconRef::ContactPhone => "contact_phone",
            IconRef::Description => "description",
            IconRef::PlayCircle => "play_circle",
            IconRef::Close => "close",
        }
    }
}

/// Props handed to the contact-preferences dialog.
///
/// The dialog's form logic lives elsewhere; the shell only decides whether it
/// is open and which address it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPreferencesProps {
    /// Whether the dialog is currently shown.
    pub open: bool,
    /// Address the dialog is scoped to.
    pub user_email: String,
}
