//! Plain record types crossing port boundaries.

use haulquest_domain::{Role, UserId};

/// Read-only view of a host-owned account row. The engine never writes
/// accounts; it only needs identity, role, and liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub role: Role,
    pub is_active: bool,
}

impl UserAccount {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            is_active: true,
        }
    }
}
