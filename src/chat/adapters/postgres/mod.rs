//! `PostgreSQL` implementation of the `ChatRepository` port using Diesel ORM.
//!
//! Messages are ordered by a `BIGSERIAL` `position` column, so append order
//! survives identical timestamps.

mod blocking_helpers;
pub mod models;
pub mod schema;

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use self::models::{ChatRow, MessageRow, NewMessage};
use self::schema::{chats, messages};
use super::batch_chat;
use crate::chat::{
    domain::{Chat, ChatId, Message, MessageId},
    error::RepositoryError,
    ports::{ChatRepository, RepositoryResult},
};

pub use blocking_helpers::PgPool;
use blocking_helpers::{get_conn, run_blocking};

const CREATE_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_chats/up.sql");

/// `PostgreSQL` implementation of [`ChatRepository`].
///
/// Uses Diesel with r2d2 connection pooling. All queries are offloaded to
/// [`tokio::task::spawn_blocking`].
///
/// # Example
///
/// ```ignore
/// use memechat::chat::adapters::postgres::PostgresChatRepository;
///
/// let repo = PostgresChatRepository::connect("postgres://...", 10).await?;
/// repo.run_migrations().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool of at most `pool_size` connections to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Connection`] when no connection can be
    /// established.
    pub async fn connect(database_url: &str, pool_size: u32) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = run_blocking(move || {
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e| RepositoryError::connection(e.to_string()))
        })
        .await?;
        Ok(Self::new(pool))
    }

    /// Creates the tables and indexes if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the schema statements fail.
    pub async fn run_migrations(&self) -> RepositoryResult<()> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(RepositoryError::database)
        })
        .await
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn find_chat(&self, id: ChatId) -> RepositoryResult<Option<Chat>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row = chats::table
                .find(id.into_inner())
                .select(ChatRow::as_select())
                .first(&mut conn)
                .optional()?;
            Ok(row.map(Chat::from))
        })
        .await
    }

    async fn create_chat(&self, chat: &Chat) -> RepositoryResult<()> {
        let pool = self.pool.clone();
        let row = ChatRow::from(chat);
        let chat_id = chat.id();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            match diesel::insert_into(chats::table)
                .values(&row)
                .execute(&mut conn)
            {
                Ok(_) => Ok(()),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Err(RepositoryError::DuplicateChat(chat_id))
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn delete_chat(&self, id: ChatId) -> RepositoryResult<()> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::delete(chats::table.find(id.into_inner())).execute(&mut conn)?;
            Ok(())
        })
        .await
    }

    async fn append_messages(&self, batch: &[Message]) -> RepositoryResult<()> {
        let Some(chat_id) = batch_chat(batch)? else {
            return Ok(());
        };
        let pool = self.pool.clone();
        let rows: Vec<NewMessage> = batch.iter().map(NewMessage::from).collect();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<_, RepositoryError, _>(|tx| {
                // Row lock on the chat serializes appends to the same chat.
                let locked = chats::table
                    .filter(chats::id.eq(chat_id.into_inner()))
                    .select(chats::id)
                    .for_update()
                    .load::<Uuid>(tx)?;
                if locked.is_empty() {
                    return Err(RepositoryError::ChatNotFound(chat_id));
                }

                let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
                let taken = messages::table
                    .filter(messages::id.eq_any(ids))
                    .select(messages::id)
                    .first::<Uuid>(tx)
                    .optional()?;
                if let Some(id) = taken {
                    return Err(RepositoryError::DuplicateMessage(MessageId::from_uuid(id)));
                }

                diesel::insert_into(messages::table)
                    .values(&rows)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn command_message_ids(&self, chat_id: ChatId) -> RepositoryResult<HashSet<MessageId>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let ids = messages::table
                .filter(messages::chat_id.eq(chat_id.into_inner()))
                .filter(messages::is_command.eq(true))
                .select(messages::id)
                .load::<Uuid>(&mut conn)?;
            Ok(ids.into_iter().map(MessageId::from_uuid).collect())
        })
        .await
    }

    async fn messages(&self, chat_id: ChatId) -> RepositoryResult<Vec<Message>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = messages::table
                .filter(messages::chat_id.eq(chat_id.into_inner()))
                .order(messages::position.asc())
                .select(MessageRow::as_select())
                .load(&mut conn)?;
            rows.into_iter().map(Message::try_from).collect()
        })
        .await
    }
}
