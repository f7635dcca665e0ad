//! Notification event catalogue and message templates.
//!
//! Every notification row stores a type tag from this closed set plus an
//! optional entity reference, so clients can deep-link without parsing the
//! message text. Message bodies are built here so wording stays uniform
//! across handlers and the background sweep.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::format_naira;

/// What kind of event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    FundSubmitted,
    FundAssigned,
    FundApproved,
    FundRejected,
    FundQueried,
    FundClosed,
    FundReopened,
    FundDiscussion,
    FundOverdue,
    SupportTicketSubmitted,
    SupportTicketReply,
    TicketStatusChanged,
    General,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::FundSubmitted => "fund_submitted",
            NotificationType::FundAssigned => "fund_assigned",
            NotificationType::FundApproved => "fund_approved",
            NotificationType::FundRejected => "fund_rejected",
            NotificationType::FundQueried => "fund_queried",
            NotificationType::FundClosed => "fund_closed",
            NotificationType::FundReopened => "fund_reopened",
            NotificationType::FundDiscussion => "fund_discussion",
            NotificationType::FundOverdue => "fund_overdue",
            NotificationType::SupportTicketSubmitted => "support_ticket_submitted",
            NotificationType::SupportTicketReply => "support_ticket_reply",
            NotificationType::TicketStatusChanged => "ticket_status_changed",
            NotificationType::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationType> {
        match s {
            "fund_submitted" => Some(NotificationType::FundSubmitted),
            "fund_assigned" => Some(NotificationType::FundAssigned),
            "fund_approved" => Some(NotificationType::FundApproved),
            "fund_rejected" => Some(NotificationType::FundRejected),
            "fund_queried" => Some(NotificationType::FundQueried),
            "fund_closed" => Some(NotificationType::FundClosed),
            "fund_reopened" => Some(NotificationType::FundReopened),
            "fund_discussion" => Some(NotificationType::FundDiscussion),
            "fund_overdue" => Some(NotificationType::FundOverdue),
            "support_ticket_submitted" => Some(NotificationType::SupportTicketSubmitted),
            "support_ticket_reply" => Some(NotificationType::SupportTicketReply),
            "ticket_status_changed" => Some(NotificationType::TicketStatusChanged),
            "general" => Some(NotificationType::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `entity_id` on a notification row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    FundRequisition,
    SupportTicket,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::FundRequisition => "fund_requisition",
            EntityType::SupportTicket => "support_ticket",
        }
    }

    pub fn parse(s: &str) -> Option<EntityType> {
        match s {
            "fund_requisition" => Some(EntityType::FundRequisition),
            "support_ticket" => Some(EntityType::SupportTicket),
            _ => None,
        }
    }
}

/// Canonical message bodies for workflow events.
pub mod messages {
    use super::*;

    pub fn fund_submitted(amount: Decimal, requester: &str) -> String {
        format!(
            "New fund requisition of {} submitted by {requester}",
            format_naira(amount)
        )
    }

    pub fn fund_submitted_receipt(amount: Decimal) -> String {
        format!(
            "Your fund requisition of {} has been submitted and is awaiting review",
            format_naira(amount)
        )
    }

    pub fn fund_assigned_to_requester(amount: Decimal, manager: &str) -> String {
        format!(
            "Your fund requisition of {} has been assigned to {manager}",
            format_naira(amount)
        )
    }

    pub fn fund_assigned_to_manager(amount: Decimal, requester: &str) -> String {
        format!(
            "A fund requisition of {} from {requester} has been assigned to you for review",
            format_naira(amount)
        )
    }

    pub fn fund_approved(amount: Decimal) -> String {
        format!(
            "Your fund requisition of {} has been approved",
            format_naira(amount)
        )
    }

    pub fn fund_rejected(amount: Decimal) -> String {
        format!(
            "Your fund requisition of {} has been rejected",
            format_naira(amount)
        )
    }

    pub fn fund_decided_for_admins(amount: Decimal, manager: &str, approved: bool) -> String {
        let verb = if approved { "approved" } else { "rejected" };
        format!(
            "{manager} {verb} the fund requisition of {}",
            format_naira(amount)
        )
    }

    pub fn fund_queried(amount: Decimal) -> String {
        format!(
            "Your fund requisition of {} has been queried; please respond",
            format_naira(amount)
        )
    }

    pub fn fund_closed(amount: Decimal, reason: &str) -> String {
        format!(
            "Your fund requisition of {} has been closed: {reason}",
            format_naira(amount)
        )
    }

    pub fn fund_reopened(amount: Decimal) -> String {
        format!(
            "Your fund requisition of {} has been reopened for processing",
            format_naira(amount)
        )
    }

    pub fn fund_discussion(author: &str) -> String {
        format!("{author} commented on a fund requisition you are part of")
    }

    pub fn fund_overdue(amount: Decimal, requester: &str, days: i64) -> String {
        format!(
            "Fund requisition of {} from {requester} has been pending for {days} days",
            format_naira(amount)
        )
    }
}
