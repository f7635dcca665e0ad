//! The closed role set and the capability matrix.
//!
//! Role names must match the seed data in
//! `20260828000001_create_roles.sql`. Authorization decisions go
//! through [`capability`] so the full matrix is auditable in one place
//! instead of being scattered across handlers as string comparisons.

use crate::types::DbId;

/// Well-known role name constants (wire / database form).
pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_HOC: &str = "hoc";
pub const ROLE_LAWYER: &str = "lawyer";
pub const ROLE_PARALEGAL: &str = "paralegal";

/// A user role. `Admin` is the Admin Officer; `Hoc` the Head of Chambers.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Superadmin = 1,
    Admin = 2,
    Manager = 3,
    Hoc = 4,
    Lawyer = 5,
    Paralegal = 6,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Superadmin,
        Role::Admin,
        Role::Manager,
        Role::Hoc,
        Role::Lawyer,
        Role::Paralegal,
    ];

    /// Database role ID matching the seed order.
    pub fn id(self) -> DbId {
        self as DbId
    }

    /// Wire / database name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => ROLE_SUPERADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Manager => ROLE_MANAGER,
            Role::Hoc => ROLE_HOC,
            Role::Lawyer => ROLE_LAWYER,
            Role::Paralegal => ROLE_PARALEGAL,
        }
    }

    /// Parse a role name as stored in the `roles` table / JWT claims.
    pub fn parse(name: &str) -> Option<Role> {
        match name {
            ROLE_SUPERADMIN => Some(Role::Superadmin),
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_MANAGER => Some(Role::Manager),
            ROLE_HOC => Some(Role::Hoc),
            ROLE_LAWYER => Some(Role::Lawyer),
            ROLE_PARALEGAL => Some(Role::Paralegal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a role can be asked to do in this core.
///
/// Identity-scoped checks (the assigned manager deciding, a recipient
/// marking their own notification read) are enforced by the handlers on
/// top of this matrix; `capability` answers only the role half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateRequisition,
    AssignRequisition,
    DecideRequisition,
    QueryRequisition,
    DiscussRequisition,
    CloseRequisition,
    ReopenRequisition,
    RunOverdueSweep,
    ManageApprovalPin,
    ResetApprovalPin,
    ViewAllRequisitions,
    ListUsers,
    ManageSupportTickets,
}

/// The authorization matrix: may `role` perform `action`?
pub fn capability(role: Role, action: Action) -> bool {
    use Action::*;
    use Role::*;

    match action {
        // Any authenticated user can request funds or raise a ticket.
        CreateRequisition => true,

        // Admin Officer workflow controls.
        AssignRequisition | QueryRequisition | CloseRequisition | ReopenRequisition => {
            role == Admin
        }

        // Only managers decide; which manager is an identity check.
        DecideRequisition => role == Manager,

        // Admin Officer or a manager may join a discussion thread.
        DiscussRequisition => matches!(role, Admin | Manager),

        RunOverdueSweep => matches!(role, Admin | Superadmin),

        ManageApprovalPin => role == Manager,
        ResetApprovalPin => role == Superadmin,

        ViewAllRequisitions => matches!(role, Admin | Manager | Superadmin),
        ListUsers => matches!(role, Admin | Superadmin),
        ManageSupportTickets => role == Superadmin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_match_seed_data() {
        assert_eq!(Role::Superadmin.id(), 1);
        assert_eq!(Role::Admin.id(), 2);
        assert_eq!(Role::Manager.id(), 3);
        assert_eq!(Role::Hoc.id(), 4);
        assert_eq!(Role::Lawyer.id(), 5);
        assert_eq!(Role::Paralegal.id(), 6);
    }

    #[test]
    fn parse_round_trips_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("intern"), None);
        // Names are case-sensitive, like the seed data.
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn only_admin_officer_controls_the_workflow() {
        for role in Role::ALL {
            let expected = role == Role::Admin;
            assert_eq!(capability(role, Action::AssignRequisition), expected);
            assert_eq!(capability(role, Action::QueryRequisition), expected);
            assert_eq!(capability(role, Action::CloseRequisition), expected);
            assert_eq!(capability(role, Action::ReopenRequisition), expected);
        }
    }

    #[test]
    fn only_managers_decide() {
        for role in Role::ALL {
            assert_eq!(
                capability(role, Action::DecideRequisition),
                role == Role::Manager
            );
        }
    }

    #[test]
    fn everyone_can_create_requisitions() {
        for role in Role::ALL {
            assert!(capability(role, Action::CreateRequisition));
        }
    }

    #[test]
    fn pin_reset_is_superadmin_only() {
        for role in Role::ALL {
            assert_eq!(
                capability(role, Action::ResetApprovalPin),
                role == Role::Superadmin
            );
        }
    }

    #[test]
    fn overdue_sweep_is_admin_or_superadmin() {
        assert!(capability(Role::Admin, Action::RunOverdueSweep));
        assert!(capability(Role::Superadmin, Action::RunOverdueSweep));
        assert!(!capability(Role::Manager, Action::RunOverdueSweep));
        assert!(!capability(Role::Lawyer, Action::RunOverdueSweep));
    }
}
