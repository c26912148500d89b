//! PostgreSQL implementation of ResponseRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, QuestionId, ResponseId, Timestamp};
use crate::domain::moderation::Verdict;
use crate::domain::question::{Response, ResponseAuthor};
use crate::ports::ResponseRepository;

use super::{corrupt_row, db_error};

const COLUMNS: &str = "id, question_id, author_role, author_id, content, moderation_score, \
     moderation_flags, is_appropriate, created_at";

#[derive(Clone)]
pub struct PostgresResponseRepository {
    pool: PgPool,
}

impl PostgresResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PostgresResponseRepository {
    async fn save(&self, response: &Response) -> Result<(), DomainError> {
        let flags = response
            .moderation_flags
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DomainError::database(format!("Failed to encode verdict: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO responses (
                id, question_id, author_role, author_id, content, moderation_score,
                moderation_flags, is_appropriate, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(response.id.as_uuid())
        .bind(response.question_id.as_uuid())
        .bind(response.sender_role().as_str())
        .bind(response.author.account_id().map(|a| *a.as_uuid()))
        .bind(&response.content)
        .bind(response.moderation_score)
        .bind(flags)
        .bind(response.is_appropriate)
        .bind(response.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert response"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<Response>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM responses WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch response"))?;

        row.as_ref().map(row_to_response).transpose()
    }

    async fn find_by_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Vec<Response>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM responses WHERE question_id = $1 ORDER BY created_at ASC, id ASC",
            COLUMNS
        ))
        .bind(question_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list responses"))?;

        rows.iter().map(row_to_response).collect()
    }

    async fn delete(&self, id: &ResponseId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM responses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete response"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ResponseNotFound,
                format!("Response not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM responses WHERE question_id = $1")
            .bind(question_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete responses"))?;
        Ok(result.rows_affected())
    }
}

fn row_to_response(row: &PgRow) -> Result<Response, DomainError> {
    let get_err = db_error("decode response row");

    let role: String = row.try_get("author_role").map_err(&get_err)?;
    let author_id: Option<uuid::Uuid> = row.try_get("author_id").map_err(&get_err)?;
    let author = match (role.as_str(), author_id) {
        ("asker", Some(id)) => ResponseAuthor::Asker(AccountId::from_uuid(id)),
        ("expert", Some(id)) => ResponseAuthor::Expert(AccountId::from_uuid(id)),
        ("ai", _) => ResponseAuthor::Ai,
        (other, _) => return Err(corrupt_row("author_role", other)),
    };

    let flags: Option<serde_json::Value> = row.try_get("moderation_flags").map_err(&get_err)?;
    let moderation_flags: Option<Verdict> = flags
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| corrupt_row("moderation_flags", e))?;

    let id: uuid::Uuid = row.try_get("id").map_err(&get_err)?;
    let question_id: uuid::Uuid = row.try_get("question_id").map_err(&get_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(&get_err)?;

    Ok(Response {
        id: ResponseId::from_uuid(id),
        question_id: QuestionId::from_uuid(question_id),
        content: row.try_get("content").map_err(&get_err)?,
        author,
        moderation_score: row.try_get("moderation_score").map_err(&get_err)?,
        moderation_flags,
        is_appropriate: row.try_get("is_appropriate").map_err(&get_err)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
