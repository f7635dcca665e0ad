//! The fund-requisition state machine.
//!
//! Statuses carry `i16` discriminants matching the `requisition_statuses`
//! seed data. Transitions are driven by [`RequisitionAction`] through an
//! explicit table; anything the table does not list is rejected with
//! [`CoreError::InvalidState`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a fund requisition.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    /// Submitted, awaiting triage by the Admin Officer.
    Pending = 1,
    /// Assigned to a manager for a decision.
    Assigned = 2,
    /// Approved by the assigned manager. Terminal.
    Approved = 3,
    /// Rejected by the assigned manager. Terminal.
    Rejected = 4,
    /// The Admin Officer queried the requester; discussion is open.
    Querying = 5,
    /// Administratively closed without a decision.
    Closed = 6,
}

impl RequisitionStatus {
    pub const ALL: [RequisitionStatus; 6] = [
        RequisitionStatus::Pending,
        RequisitionStatus::Assigned,
        RequisitionStatus::Approved,
        RequisitionStatus::Rejected,
        RequisitionStatus::Querying,
        RequisitionStatus::Closed,
    ];

    /// Database status ID, matching the seed order.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<RequisitionStatus> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "pending",
            RequisitionStatus::Assigned => "assigned",
            RequisitionStatus::Approved => "approved",
            RequisitionStatus::Rejected => "rejected",
            RequisitionStatus::Querying => "querying",
            RequisitionStatus::Closed => "closed",
        }
    }

    /// Approved and Rejected accept no further actions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequisitionStatus::Approved | RequisitionStatus::Rejected
        )
    }
}

impl std::fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the requested funds are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionType {
    OfficeSupplies,
    Travel,
    LegalFees,
    CourtFees,
    ProfessionalServices,
    Utilities,
    Other,
}

impl RequisitionType {
    pub const ALL: [RequisitionType; 7] = [
        RequisitionType::OfficeSupplies,
        RequisitionType::Travel,
        RequisitionType::LegalFees,
        RequisitionType::CourtFees,
        RequisitionType::ProfessionalServices,
        RequisitionType::Utilities,
        RequisitionType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequisitionType::OfficeSupplies => "office_supplies",
            RequisitionType::Travel => "travel",
            RequisitionType::LegalFees => "legal_fees",
            RequisitionType::CourtFees => "court_fees",
            RequisitionType::ProfessionalServices => "professional_services",
            RequisitionType::Utilities => "utilities",
            RequisitionType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<RequisitionType> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Requester-declared urgency. Informational; it does not gate transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Urgency> {
        Self::ALL.into_iter().find(|u| u.as_str() == s)
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

/// A workflow action applied to an existing requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionAction {
    Assign,
    Approve,
    Reject,
    Query,
    Close,
    Reopen,
}

impl RequisitionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RequisitionAction::Assign => "assign",
            RequisitionAction::Approve => "approve",
            RequisitionAction::Reject => "reject",
            RequisitionAction::Query => "query",
            RequisitionAction::Close => "close",
            RequisitionAction::Reopen => "reopen",
        }
    }

    /// Statuses from which this action is permitted. Repositories use this
    /// set as the guard in compare-and-swap updates.
    pub fn allowed_sources(self) -> &'static [RequisitionStatus] {
        use RequisitionStatus::*;
        match self {
            RequisitionAction::Assign => &[Pending, Querying],
            RequisitionAction::Approve | RequisitionAction::Reject => &[Assigned],
            RequisitionAction::Query => &[Pending],
            RequisitionAction::Close => &[Pending, Querying],
            RequisitionAction::Reopen => &[Querying, Closed],
        }
    }

    /// Status the requisition lands in when the action succeeds.
    pub fn target(self) -> RequisitionStatus {
        use RequisitionStatus::*;
        match self {
            RequisitionAction::Assign => Assigned,
            RequisitionAction::Approve => Approved,
            RequisitionAction::Reject => Rejected,
            RequisitionAction::Query => Querying,
            RequisitionAction::Close => Closed,
            RequisitionAction::Reopen => Pending,
        }
    }
}

/// Validate a transition and return the resulting status.
pub fn transition(
    from: RequisitionStatus,
    action: RequisitionAction,
) -> Result<RequisitionStatus, CoreError> {
    if action.allowed_sources().contains(&from) {
        Ok(action.target())
    } else {
        Err(CoreError::InvalidState {
            from: from.as_str(),
            action: action.as_str(),
        })
    }
}
