//! Role-based write gating.
//!
//! Policy is a single capability table consulted by every repository write
//! path, so changing who may write what stays a one-line edit here rather
//! than a hunt across call sites. Reads are never gated.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// The four gated collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Users,
    Ships,
    Components,
    Jobs,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Ships => "ships",
            Self::Components => "components",
            Self::Jobs => "jobs",
        }
    }

    /// The blob store key this collection persists under.
    pub fn blob_key(&self) -> &'static str {
        match self {
            Self::Users => "fleet_users",
            Self::Ships => "fleet_ships",
            Self::Components => "fleet_components",
            Self::Jobs => "fleet_jobs",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` may mutate `resource`.
///
/// Default policy: Admin and Engineer hold write access to fleet data;
/// user accounts are Admin-only; Inspector and Viewer are read-only.
pub fn can_write(role: Role, resource: ResourceKind) -> bool {
    match resource {
        ResourceKind::Users => matches!(role, Role::Admin),
        ResourceKind::Ships | ResourceKind::Components | ResourceKind::Jobs => {
            matches!(role, Role::Admin | Role::Engineer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_writes_everything() {
        for resource in [
            ResourceKind::Users,
            ResourceKind::Ships,
            ResourceKind::Components,
            ResourceKind::Jobs,
        ] {
            assert!(can_write(Role::Admin, resource));
        }
    }

    #[test]
    fn engineer_writes_fleet_data_but_not_users() {
        assert!(can_write(Role::Engineer, ResourceKind::Ships));
        assert!(can_write(Role::Engineer, ResourceKind::Components));
        assert!(can_write(Role::Engineer, ResourceKind::Jobs));
        assert!(!can_write(Role::Engineer, ResourceKind::Users));
    }

    #[test]
    fn inspector_and_viewer_are_read_only() {
        for role in [Role::Inspector, Role::Viewer] {
            for resource in [
                ResourceKind::Users,
                ResourceKind::Ships,
                ResourceKind::Components,
                ResourceKind::Jobs,
            ] {
                assert!(!can_write(role, resource));
            }
        }
    }
}
