use jengamart_core::UserId;

/// Verified session identity, inserted by the session middleware.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user_id: UserId,
    username: String,
    admin: bool,
}

impl SessionContext {
    pub fn new(user_id: UserId, username: String, admin: bool) -> Self {
        Self { user_id, username, admin }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Admin flag as of token issue; admin routes re-check the store.
    pub fn admin(&self) -> bool {
        self.admin
    }
}
