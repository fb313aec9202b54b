use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Closed set of caller roles. Permission checks go through the capability
/// methods below, never through string comparison at call sites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Learner,
    General,
}

impl Role {
    pub fn can_book_workspace(self) -> bool {
        true
    }

    pub fn can_view_all_bookings(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_workspaces(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_holds_management_capabilities() {
        for role in [Role::Employee, Role::Learner, Role::General] {
            assert!(role.can_book_workspace());
            assert!(!role.can_view_all_bookings());
            assert!(!role.can_manage_workspaces());
            assert!(!role.can_manage_users());
        }
        assert!(Role::Admin.can_view_all_bookings());
        assert!(Role::Admin.can_manage_workspaces());
        assert!(Role::Admin.can_manage_users());
    }

    #[test]
    fn role_parses_from_stored_value() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("learner".parse::<Role>().unwrap(), Role::Learner);
        assert!("superuser".parse::<Role>().is_err());
    }
}
