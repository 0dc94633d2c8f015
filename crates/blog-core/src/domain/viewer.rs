use uuid::Uuid;

/// The identity making the current request; anonymous when `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer(Option<Uuid>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(user_id: Uuid) -> Self {
        Self(Some(user_id))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// True when the viewer is the given user. Anonymous viewers are nobody.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.0 == Some(user_id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(user_id: Option<Uuid>) -> Self {
        Self(user_id)
    }
}
