//! Support ticket repository

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use nutrigen_shared::models::{SupportTicket, TicketStatus};
use nutrigen_shared::types::AdminTicketView;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub admin_reply: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRecord> for SupportTicket {
    type Error = anyhow::Error;

    fn try_from(record: TicketRecord) -> Result<Self> {
        let status: TicketStatus = record.status.parse().map_err(|e: String| anyhow!(e))?;
        Ok(SupportTicket {
            id: record.id,
            user_id: record.user_id,
            message: record.message,
            admin_reply: record.admin_reply,
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Ticket joined with its author
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketWithUserRecord {
    #[sqlx(flatten)]
    pub ticket: TicketRecord,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TryFrom<TicketWithUserRecord> for AdminTicketView {
    type Error = anyhow::Error;

    fn try_from(record: TicketWithUserRecord) -> Result<Self> {
        Ok(AdminTicketView {
            ticket: record.ticket.try_into()?,
            user_name: format!("{} {}", record.first_name, record.last_name),
            user_email: record.email,
        })
    }
}

const TICKET_COLUMNS: &str = "id, user_id, message, admin_reply, status, created_at, updated_at";

const TICKET_WITH_USER_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.message, t.admin_reply, t.status, t.created_at, t.updated_at,
           u.first_name, u.last_name, u.email
    FROM support_tickets t
    JOIN users u ON u.id = t.user_id
"#;

/// Support ticket repository for database operations
pub struct TicketRepository;

impl TicketRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, message: &str) -> Result<SupportTicket> {
        let record = sqlx::query_as::<_, TicketRecord>(&format!(
            r#"
            INSERT INTO support_tickets (user_id, message)
            VALUES ($1, $2)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(message)
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// A user's own tickets, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<SupportTicket>> {
        let records = sqlx::query_as::<_, TicketRecord>(&format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        records.into_iter().map(SupportTicket::try_from).collect()
    }

    /// Every ticket with its author, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminTicketView>> {
        let records = sqlx::query_as::<_, TicketWithUserRecord>(&format!(
            "{TICKET_WITH_USER_SELECT} ORDER BY t.created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        records.into_iter().map(AdminTicketView::try_from).collect()
    }

    /// Set or overwrite the admin reply and mark the ticket replied
    pub async fn reply(pool: &PgPool, ticket_id: Uuid, reply: &str) -> Result<Option<AdminTicketView>> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE support_tickets
            SET admin_reply = $2, status = 'replied', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .bind(reply)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let record = sqlx::query_as::<_, TicketWithUserRecord>(&format!(
            "{TICKET_WITH_USER_SELECT} WHERE t.id = $1"
        ))
        .bind(ticket_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(record.try_into()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_view_joins_name() {
        let record = TicketWithUserRecord {
            ticket: TicketRecord {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                message: "Plan did not generate".to_string(),
                admin_reply: Some("Fixed".to_string()),
                status: "replied".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
        };

        let view = AdminTicketView::try_from(record).unwrap();
        assert_eq!(view.user_name, "Asha Rao");
        assert_eq!(view.ticket.status, TicketStatus::Replied);
    }
}
