//! Support ticket vocabulary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Complaint,
    FeatureRequest,
}

impl TicketType {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketType::Complaint => "complaint",
            TicketType::FeatureRequest => "feature_request",
        }
    }

    pub fn parse(s: &str) -> Option<TicketType> {
        match s {
            "complaint" => Some(TicketType::Complaint),
            "feature_request" => Some(TicketType::FeatureRequest),
            _ => None,
        }
    }
}

/// Ticket lifecycle labels. Complaints move through the awaiting/fixing
/// track; feature requests through the sent/implementing track. The label
/// is informational and any status may be set on any ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    AwaitingReply,
    Fixing,
    Fixed,
    Sent,
    Seen,
    Implementing,
    Added,
    NotAdded,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 8] = [
        TicketStatus::AwaitingReply,
        TicketStatus::Fixing,
        TicketStatus::Fixed,
        TicketStatus::Sent,
        TicketStatus::Seen,
        TicketStatus::Implementing,
        TicketStatus::Added,
        TicketStatus::NotAdded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::AwaitingReply => "awaiting_reply",
            TicketStatus::Fixing => "fixing",
            TicketStatus::Fixed => "fixed",
            TicketStatus::Sent => "sent",
            TicketStatus::Seen => "seen",
            TicketStatus::Implementing => "implementing",
            TicketStatus::Added => "added",
            TicketStatus::NotAdded => "not_added",
        }
    }

    pub fn parse(s: &str) -> Option<TicketStatus> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}
