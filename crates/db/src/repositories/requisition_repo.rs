//! Repository for the `fund_requisitions` table.
//!
//! Workflow transitions are single-statement compare-and-swap updates:
//! the `WHERE` clause carries the set of statuses the action is valid
//! from, so a concurrent transition makes the second writer's update
//! match zero rows instead of silently overwriting. Methods return
//! `Ok(None)` when the guard did not match; callers translate that into
//! a not-found or invalid-state error by re-reading the row.

use sqlx::PgPool;

use chambers_core::requisition::{RequisitionAction, RequisitionStatus};
use chambers_core::types::{DbId, Timestamp};

use crate::models::requisition::{
    CreateRequisition, Discussion, FundRequisition, FundRequisitionDetail,
};

/// Column list for `fund_requisitions` queries.
const COLUMNS: &str = "id, requester_id, amount, purpose, requisition_type, urgency, status_id, \
                       assigned_to, assigned_by, assigned_at, decided_at, manager_comment, \
                       closure_reason, created_at, updated_at";

/// Detail columns: requisition joined with requester and assignee names.
const DETAIL_COLUMNS: &str =
    "f.id, f.requester_id, req.full_name AS requester_name, f.amount, f.purpose, \
     f.requisition_type, f.urgency, f.status_id, f.assigned_to, mgr.full_name AS assignee_name, \
     f.assigned_by, f.assigned_at, f.decided_at, f.manager_comment, f.closure_reason, \
     f.created_at, f.updated_at";

const DETAIL_FROM: &str = "FROM fund_requisitions f
     JOIN users req ON req.id = f.requester_id
     LEFT JOIN users mgr ON mgr.id = f.assigned_to";

fn source_ids(action: RequisitionAction) -> Vec<i16> {
    action.allowed_sources().iter().map(|s| s.id()).collect()
}

/// Provides CRUD and workflow-transition operations for fund requisitions.
pub struct RequisitionRepo;

impl RequisitionRepo {
    /// Insert a new requisition in `pending` status, returning the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRequisition,
    ) -> Result<FundRequisition, sqlx::Error> {
        let query = format!(
            "INSERT INTO fund_requisitions (requester_id, amount, purpose, requisition_type, urgency)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(input.requester_id)
            .bind(input.amount)
            .bind(&input.purpose)
            .bind(&input.requisition_type)
            .bind(&input.urgency)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FundRequisition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fund_requisitions WHERE id = $1");
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a requisition with display names resolved.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FundRequisitionDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE f.id = $1");
        sqlx::query_as::<_, FundRequisitionDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all requisitions, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<RequisitionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FundRequisitionDetail>, sqlx::Error> {
        let filter = if status.is_some() {
            "WHERE f.status_id = $3"
        } else {
            ""
        };
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} {filter}
             ORDER BY f.created_at DESC
             LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, FundRequisitionDetail>(&query)
            .bind(limit)
            .bind(offset);
        if let Some(status) = status {
            q = q.bind(status.id());
        }
        q.fetch_all(pool).await
    }

    /// List a requester's own requisitions, newest first.
    pub async fn list_for_requester(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<FundRequisitionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE f.requester_id = $1
             ORDER BY f.created_at DESC"
        );
        sqlx::query_as::<_, FundRequisitionDetail>(&query)
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    /// List requisitions currently assigned to a manager and awaiting a
    /// decision, oldest first.
    pub async fn list_assigned_to(
        pool: &PgPool,
        manager_id: DbId,
    ) -> Result<Vec<FundRequisitionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE f.assigned_to = $1 AND f.status_id = $2
             ORDER BY f.created_at"
        );
        sqlx::query_as::<_, FundRequisitionDetail>(&query)
            .bind(manager_id)
            .bind(RequisitionStatus::Assigned.id())
            .fetch_all(pool)
            .await
    }

    /// Assign a requisition to a manager. Valid from `pending` or
    /// `querying`; returns `None` when the status guard did not match.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        manager_id: DbId,
        assigned_by: DbId,
    ) -> Result<Option<FundRequisition>, sqlx::Error> {
        let query = format!(
            "UPDATE fund_requisitions SET
                status_id = $2,
                assigned_to = $3,
                assigned_by = $4,
                assigned_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status_id = ANY($5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .bind(RequisitionAction::Assign.target().id())
            .bind(manager_id)
            .bind(assigned_by)
            .bind(source_ids(RequisitionAction::Assign))
            .fetch_optional(pool)
            .await
    }

    /// Approve or reject an assigned requisition.
    ///
    /// The guard also pins `assigned_to`, so only the manager the work was
    /// assigned to can decide it.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        manager_id: DbId,
        approve: bool,
        comment: Option<&str>,
    ) -> Result<Option<FundRequisition>, sqlx::Error> {
        let action = if approve {
            RequisitionAction::Approve
        } else {
            RequisitionAction::Reject
        };
        let query = format!(
            "UPDATE fund_requisitions SET
                status_id = $2,
                manager_comment = $4,
                decided_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND assigned_to = $3 AND status_id = ANY($5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .bind(action.target().id())
            .bind(manager_id)
            .bind(comment)
            .bind(source_ids(action))
            .fetch_optional(pool)
            .await
    }

    /// Move a pending requisition into `querying`.
    pub async fn query_requisition(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FundRequisition>, sqlx::Error> {
        let query = format!(
            "UPDATE fund_requisitions SET status_id = $2, updated_at = NOW()
             WHERE id = $1 AND status_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .bind(RequisitionAction::Query.target().id())
            .bind(source_ids(RequisitionAction::Query))
            .fetch_optional(pool)
            .await
    }

    /// Administratively close a requisition without a decision.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<FundRequisition>, sqlx::Error> {
        let query = format!(
            "UPDATE fund_requisitions SET
                status_id = $2,
                closure_reason = $3,
                updated_at = NOW()
             WHERE id = $1 AND status_id = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .bind(RequisitionAction::Close.target().id())
            .bind(reason)
            .bind(source_ids(RequisitionAction::Close))
            .fetch_optional(pool)
            .await
    }

    /// Reopen a queried or closed requisition back to `pending`, clearing
    /// any previous assignment and closure state.
    pub async fn reopen(pool: &PgPool, id: DbId) -> Result<Option<FundRequisition>, sqlx::Error> {
        let query = format!(
            "UPDATE fund_requisitions SET
                status_id = $2,
                assigned_to = NULL,
                assigned_by = NULL,
                assigned_at = NULL,
                closure_reason = NULL,
                updated_at = NOW()
             WHERE id = $1 AND status_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FundRequisition>(&query)
            .bind(id)
            .bind(RequisitionAction::Reopen.target().id())
            .bind(source_ids(RequisitionAction::Reopen))
            .fetch_optional(pool)
            .await
    }

    /// List pending requisitions created before `cutoff`.
    ///
    /// Used by the overdue sweep; the partial index on pending rows keeps
    /// this cheap.
    pub async fn list_pending_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<FundRequisitionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE f.status_id = $1 AND f.created_at < $2
             ORDER BY f.created_at"
        );
        sqlx::query_as::<_, FundRequisitionDetail>(&query)
            .bind(RequisitionStatus::Pending.id())
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Append a discussion entry. `author_id = None` marks a system note.
    pub async fn add_discussion(
        pool: &PgPool,
        requisition_id: DbId,
        author_id: Option<DbId>,
        body: &str,
    ) -> Result<Discussion, sqlx::Error> {
        sqlx::query_as::<_, Discussion>(
            "INSERT INTO requisition_discussions (requisition_id, author_id, body)
             VALUES ($1, $2, $3)
             RETURNING id, requisition_id, author_id, body, created_at",
        )
        .bind(requisition_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(pool)
        .await
    }

    /// List a requisition's discussion thread, oldest first.
    pub async fn list_discussions(
        pool: &PgPool,
        requisition_id: DbId,
    ) -> Result<Vec<Discussion>, sqlx::Error> {
        sqlx::query_as::<_, Discussion>(
            "SELECT id, requisition_id, author_id, body, created_at
             FROM requisition_discussions
             WHERE requisition_id = $1
             ORDER BY created_at",
        )
        .bind(requisition_id)
        .fetch_all(pool)
        .await
    }
}
