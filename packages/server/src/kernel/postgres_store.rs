//! PostgreSQL implementation of the persistence port.
//!
//! Each unit of work is one `sqlx` transaction. `lock_*` reads use
//! `SELECT ... FOR UPDATE`, which is what serializes two owners accepting
//! rival requests for the same room: the second blocks on the room row and
//! then sees it reserved.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::traits::{BaseStore, StatsScope, StoreTx};
use crate::common::{ConversationId, MatchId, MemberId, RoomId, RoomRequestId};
use crate::domains::conversations::models::{Conversation, Message, MessageCounts};
use crate::domains::matches::models::{Match, MatchStatus};
use crate::domains::requests::models::{RequestStatus, RoomRequest};
use crate::domains::rooms::models::{Property, Room, RoomStatus};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn insert_property(&mut self, property: &Property) -> Result<()> {
        sqlx::query(
            "INSERT INTO properties (id, owner_id, name, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(property.id)
        .bind(property.owner_id)
        .bind(&property.name)
        .bind(property.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_room(&mut self, room: &Room) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, property_id, title, status, monthly_rent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(room.id)
        .bind(room.property_id)
        .bind(&room.title)
        .bind(room.status)
        .bind(room.monthly_rent)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_room(&mut self, id: RoomId) -> Result<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn lock_room(&mut self, id: RoomId) -> Result<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn set_room_status(
        &mut self,
        id: RoomId,
        from: RoomStatus,
        to: RoomStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE rooms SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn room_owner(&mut self, id: RoomId) -> Result<Option<MemberId>> {
        sqlx::query_scalar::<_, MemberId>(
            r#"
            SELECT p.owner_id
            FROM rooms r
            JOIN properties p ON p.id = r.property_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(Into::into)
    }

    async fn insert_request(&mut self, request: &RoomRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO room_requests (
                id, room_id, requester_id, request_type, status, move_in_date, stay_months,
                message, response_message, responded_at, expires_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id)
        .bind(request.room_id)
        .bind(request.requester_id)
        .bind(request.request_type)
        .bind(request.status)
        .bind(request.move_in_date)
        .bind(request.stay_months)
        .bind(&request.message)
        .bind(&request.response_message)
        .bind(request.responded_at)
        .bind(request.expires_at)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>> {
        sqlx::query_as::<_, RoomRequest>("SELECT * FROM room_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn lock_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>> {
        sqlx::query_as::<_, RoomRequest>("SELECT * FROM room_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn update_request(&mut self, request: &RoomRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE room_requests
            SET status = $2,
                response_message = $3,
                responded_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(request.status)
        .bind(&request.response_message)
        .bind(request.responded_at)
        .bind(request.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn has_pending_request(&mut self, room_id: RoomId, requester_id: MemberId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM room_requests
                WHERE room_id = $1 AND requester_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(room_id)
        .bind(requester_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Into::into)
    }

    async fn pending_requests_for_room(&mut self, room_id: RoomId) -> Result<Vec<RoomRequest>> {
        sqlx::query_as::<_, RoomRequest>(
            r#"
            SELECT * FROM room_requests
            WHERE room_id = $1 AND status = 'pending'
            ORDER BY created_at
            FOR UPDATE
            "#,
        )
        .bind(room_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(Into::into)
    }

    async fn expire_pending_requests(&mut self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE room_requests
            SET status = 'expired', updated_at = $1
            WHERE status = 'pending' AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn request_status_counts(&mut self, scope: StatsScope) -> Result<Vec<(RequestStatus, i64)>> {
        let rows = match scope {
            StatsScope::All => {
                sqlx::query_as::<_, (RequestStatus, i64)>(
                    "SELECT status, COUNT(*) FROM room_requests GROUP BY status",
                )
                .fetch_all(&mut *self.tx)
                .await?
            }
            StatsScope::Owner(owner_id) => {
                sqlx::query_as::<_, (RequestStatus, i64)>(
                    r#"
                    SELECT rr.status, COUNT(*)
                    FROM room_requests rr
                    JOIN rooms r ON r.id = rr.room_id
                    JOIN properties p ON p.id = r.property_id
                    WHERE p.owner_id = $1
                    GROUP BY rr.status
                    "#,
                )
                .bind(owner_id)
                .fetch_all(&mut *self.tx)
                .await?
            }
            StatsScope::Seeker(requester_id) => {
                sqlx::query_as::<_, (RequestStatus, i64)>(
                    "SELECT status, COUNT(*) FROM room_requests WHERE requester_id = $1 GROUP BY status",
                )
                .bind(requester_id)
                .fetch_all(&mut *self.tx)
                .await?
            }
        };
        Ok(rows)
    }

    async fn insert_match(&mut self, record: &Match) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                id, room_id, roomie_id, request_id, status, monthly_rent, move_in_date,
                move_out_date, deposit_paid, contract_signed, contract_url, owner_rating,
                owner_review, roomie_rating, roomie_review, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(record.id)
        .bind(record.room_id)
        .bind(record.roomie_id)
        .bind(record.request_id)
        .bind(record.status)
        .bind(record.monthly_rent)
        .bind(record.move_in_date)
        .bind(record.move_out_date)
        .bind(record.deposit_paid)
        .bind(record.contract_signed)
        .bind(&record.contract_url)
        .bind(record.owner_rating)
        .bind(&record.owner_review)
        .bind(record.roomie_rating)
        .bind(&record.roomie_review)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_match(&mut self, id: MatchId) -> Result<Option<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn lock_match(&mut self, id: MatchId) -> Result<Option<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn update_match(&mut self, record: &Match) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE matches
            SET status = $2,
                move_in_date = $3,
                move_out_date = $4,
                deposit_paid = $5,
                contract_signed = $6,
                contract_url = $7,
                owner_rating = $8,
                owner_review = $9,
                roomie_rating = $10,
                roomie_review = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.status)
        .bind(record.move_in_date)
        .bind(record.move_out_date)
        .bind(record.deposit_paid)
        .bind(record.contract_signed)
        .bind(&record.contract_url)
        .bind(record.owner_rating)
        .bind(&record.owner_review)
        .bind(record.roomie_rating)
        .bind(&record.roomie_review)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_match_for_request(&mut self, request_id: RoomRequestId) -> Result<Option<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE request_id = $1")
            .bind(request_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn count_open_matches_for_room(&mut self, room_id: RoomId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM matches
            WHERE room_id = $1 AND status IN ('active', 'pending_payment', 'confirmed')
            "#,
        )
        .bind(room_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Into::into)
    }

    async fn match_status_counts(&mut self, scope: StatsScope) -> Result<Vec<(MatchStatus, i64)>> {
        let rows = match scope {
            StatsScope::All => {
                sqlx::query_as::<_, (MatchStatus, i64)>(
                    "SELECT status, COUNT(*) FROM matches GROUP BY status",
                )
                .fetch_all(&mut *self.tx)
                .await?
            }
            StatsScope::Owner(owner_id) => {
                sqlx::query_as::<_, (MatchStatus, i64)>(
                    r#"
                    SELECT m.status, COUNT(*)
                    FROM matches m
                    JOIN rooms r ON r.id = m.room_id
                    JOIN properties p ON p.id = r.property_id
                    WHERE p.owner_id = $1
                    GROUP BY m.status
                    "#,
                )
                .bind(owner_id)
                .fetch_all(&mut *self.tx)
                .await?
            }
            StatsScope::Seeker(roomie_id) => {
                sqlx::query_as::<_, (MatchStatus, i64)>(
                    "SELECT status, COUNT(*) FROM matches WHERE roomie_id = $1 GROUP BY status",
                )
                .bind(roomie_id)
                .fetch_all(&mut *self.tx)
                .await?
            }
        };
        Ok(rows)
    }

    async fn insert_conversation(&mut self, conversation: &Conversation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, match_id, is_active, last_message_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.match_id)
        .bind(conversation.is_active)
        .bind(conversation.last_message_at)
        .bind(conversation.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_conversation(&mut self, id: ConversationId) -> Result<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn find_conversation_for_match(&mut self, match_id: MatchId) -> Result<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE match_id = $1")
            .bind(match_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Into::into)
    }

    async fn update_conversation(&mut self, conversation: &Conversation) -> Result<()> {
        sqlx::query(
            "UPDATE conversations SET is_active = $2, last_message_at = $3 WHERE id = $1",
        )
        .bind(conversation.id)
        .bind(conversation.is_active)
        .bind(conversation.last_message_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_message(&mut self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn message_counts(&mut self, id: ConversationId, reader: MemberId) -> Result<MessageCounts> {
        sqlx::query_as::<_, MessageCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE sender_id <> $2 AND NOT is_read) AS unread
            FROM messages
            WHERE conversation_id = $1
            "#,
        )
        .bind(id)
        .bind(reader)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Into::into)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let PgTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
