//! Support tickets raised by users and answered by admins

use crate::error::ApiError;
use crate::repositories::TicketRepository;
use nutrigen_shared::models::SupportTicket;
use nutrigen_shared::types::AdminTicketView;
use nutrigen_shared::validation::validate_ticket_message;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct SupportService;

impl SupportService {
    pub async fn create(pool: &PgPool, user_id: Uuid, message: &str) -> Result<SupportTicket, ApiError> {
        validate_ticket_message(message).map_err(ApiError::Validation)?;

        let ticket = TicketRepository::create(pool, user_id, message.trim())
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, ticket_id = %ticket.id, "Support ticket created");
        Ok(ticket)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<SupportTicket>, ApiError> {
        TicketRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminTicketView>, ApiError> {
        TicketRepository::list_all(pool).await.map_err(ApiError::Internal)
    }

    /// Set or edit the reply on a ticket
    pub async fn reply(pool: &PgPool, ticket_id: Uuid, reply: &str) -> Result<AdminTicketView, ApiError> {
        if reply.trim().is_empty() {
            return Err(ApiError::Validation("Reply is required".to_string()));
        }

        TicketRepository::reply(pool, ticket_id, reply.trim())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Ticket not found.".to_string()))
    }
}
