use crate::model::screen::Screen;

/// Who is looking at the data.
///
/// Passed explicitly into store fetches and edit checks instead of living
/// in ambient global state. `view_as` mirrors the original read-only
/// sharing link: a second owner whose items and screens are visible but
/// not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user, if any
    pub user_email: Option<String>,
    /// An additional owner whose data is visible read-only
    pub view_as: Option<String>,
}

impl Session {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Session {
            user_email: Some(email.into()),
            view_as: None,
        }
    }

    /// Owners whose documents this session may read. Empty when nobody is
    /// signed in and no view-as owner is set, in which case fetches
    /// return nothing.
    pub fn viewer_emails(&self) -> Vec<&str> {
        self.user_email
            .iter()
            .chain(self.view_as.iter())
            .map(String::as_str)
            .collect()
    }

    /// Only the owner may mutate a screen.
    pub fn can_edit_screen(&self, screen: &Screen) -> bool {
        match (&self.user_email, &screen.owner_email) {
            (Some(user), Some(owner)) => user == owner,
            _ => false,
        }
    }
}
