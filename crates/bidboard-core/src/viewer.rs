//! Authenticated viewer and its fetch scope.
//!
//! The remote identifies privileged accounts with a numeric role code. The
//! client maps that code once, at the boundary, into [`Role`] and asks the
//! role what it may see instead of comparing numbers at call sites.

use crate::id::ViewerId;

/// Capability level of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Regular account: sees its own requests.
    #[default]
    Member,
    /// Privileged account: sees every request.
    Admin,
}

impl Role {
    /// Role code the remote uses for privileged accounts.
    pub const ADMIN_CODE: u16 = 500;

    /// Map a remote role code. Anything but [`Role::ADMIN_CODE`] is a member.
    pub fn from_code(code: u16) -> Self {
        if code == Self::ADMIN_CODE { Self::Admin } else { Self::Member }
    }

    /// Which requests this role may bulk-fetch.
    pub fn fetch_scope(self) -> FetchScope {
        match self {
            Self::Admin => FetchScope::All,
            Self::Member => FetchScope::Own,
        }
    }
}

/// Scope of the initial request fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchScope {
    /// Every request on the remote.
    All,
    /// Only requests owned by the viewer.
    Own,
}

/// The currently authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Account identity.
    pub id: ViewerId,
    /// Capability level.
    pub role: Role,
}

impl Viewer {
    /// Viewer with an explicit role.
    pub fn new(id: impl Into<ViewerId>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    /// Regular account.
    pub fn member(id: impl Into<ViewerId>) -> Self {
        Self::new(id, Role::Member)
    }

    /// Privileged account.
    pub fn admin(id: impl Into<ViewerId>) -> Self {
        Self::new(id, Role::Admin)
    }

    /// Whether this viewer may list requests owned by others.
    pub fn can_view_all_requests(&self) -> bool {
        self.fetch_scope() == FetchScope::All
    }

    /// Scope of this viewer's request fetch.
    pub fn fetch_scope(&self) -> FetchScope {
        self.role.fetch_scope()
    }
}
