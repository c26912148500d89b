//! PostgreSQL implementation of QuestionRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, QuestionId, Timestamp};
use crate::domain::question::{Question, QuestionStatus, Rating};
use crate::ports::QuestionRepository;

use super::{corrupt_row, db_error, is_unique_violation};

const COLUMNS: &str = "id, asker_id, expert_id, content, category, attachment, status, \
     is_flagged, safety_score, rating, feedback, created_at, updated_at, version";

#[derive(Clone)]
pub struct PostgresQuestionRepository {
    pool: PgPool,
}

impl PostgresQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn newest_first_by(
        &self,
        column: &str,
        account: &AccountId,
    ) -> Result<Vec<Question>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE {} = $1 ORDER BY created_at DESC",
            COLUMNS, column
        ))
        .bind(account.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list questions"))?;
        rows.iter().map(row_to_question).collect()
    }
}

fn not_found(id: &QuestionId) -> DomainError {
    DomainError::new(
        ErrorCode::QuestionNotFound,
        format!("Question not found: {}", id),
    )
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn save(&self, question: &Question) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO questions (
                id, asker_id, expert_id, content, category, attachment, status,
                is_flagged, safety_score, rating, feedback, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(question.id.as_uuid())
        .bind(question.asker_id.as_uuid())
        .bind(question.expert_id.map(|e| *e.as_uuid()))
        .bind(&question.content)
        .bind(question.category.as_str())
        .bind(question.attachment.as_deref())
        .bind(question.status.as_str())
        .bind(question.is_flagged)
        .bind(question.safety_score)
        .bind(question.rating.map(|r| r.value() as i16))
        .bind(question.feedback.as_deref())
        .bind(question.created_at.as_datetime())
        .bind(question.updated_at.as_datetime())
        .bind(question.version as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!("Question {} already exists", question.id),
                )
            } else {
                db_error("insert question")(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, question: &Question) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE questions SET
                expert_id = $2,
                category = $3,
                status = $4,
                is_flagged = $5,
                rating = $6,
                feedback = $7,
                updated_at = $8,
                version = version + 1
            WHERE id = $1 AND version = $9
            "#,
        )
        .bind(question.id.as_uuid())
        .bind(question.expert_id.map(|e| *e.as_uuid()))
        .bind(question.category.as_str())
        .bind(question.status.as_str())
        .bind(question.is_flagged)
        .bind(question.rating.map(|r| r.value() as i16))
        .bind(question.feedback.as_deref())
        .bind(question.updated_at.as_datetime())
        .bind(question.version as i64)
        .execute(&self.pool)
        .await
        .map_err(db_error("update question"))?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)",
            )
            .bind(question.id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check question existence"))?;

            return Err(if exists {
                DomainError::concurrent_modification("Question", question.id)
            } else {
                not_found(&question.id)
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM questions WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch question"))?;

        row.as_ref().map(row_to_question).transpose()
    }

    async fn find_by_asker(&self, asker_id: &AccountId) -> Result<Vec<Question>, DomainError> {
        self.newest_first_by("asker_id", asker_id).await
    }

    async fn find_by_expert(&self, expert_id: &AccountId) -> Result<Vec<Question>, DomainError> {
        self.newest_first_by("expert_id", expert_id).await
    }

    async fn find_flagged(&self) -> Result<Vec<Question>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE is_flagged ORDER BY created_at DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list flagged questions"))?;
        rows.iter().map(row_to_question).collect()
    }

    async fn count_by_status(&self, status: QuestionStatus) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count questions"))?;
        Ok(count as u64)
    }

    async fn count_flagged(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE is_flagged")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count flagged questions"))?;
        Ok(count as u64)
    }

    async fn delete(&self, id: &QuestionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete question"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn row_to_question(row: &PgRow) -> Result<Question, DomainError> {
    let get_err = db_error("decode question row");

    let category: String = row.try_get("category").map_err(&get_err)?;
    let status: String = row.try_get("status").map_err(&get_err)?;
    let rating: Option<i16> = row.try_get("rating").map_err(&get_err)?;
    let rating = rating
        .map(|r| Rating::new(i32::from(r)))
        .transpose()
        .map_err(|e| corrupt_row("rating", e))?;

    let id: uuid::Uuid = row.try_get("id").map_err(&get_err)?;
    let asker_id: uuid::Uuid = row.try_get("asker_id").map_err(&get_err)?;
    let expert_id: Option<uuid::Uuid> = row.try_get("expert_id").map_err(&get_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(&get_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(&get_err)?;
    let version: i64 = row.try_get("version").map_err(&get_err)?;

    Ok(Question {
        id: QuestionId::from_uuid(id),
        asker_id: AccountId::from_uuid(asker_id),
        expert_id: expert_id.map(AccountId::from_uuid),
        content: row.try_get("content").map_err(&get_err)?,
        category: category.parse().map_err(|e| corrupt_row("category", e))?,
        attachment: row.try_get("attachment").map_err(&get_err)?,
        status: status.parse().map_err(|e| corrupt_row("status", e))?,
        is_flagged: row.try_get("is_flagged").map_err(&get_err)?,
        safety_score: row.try_get("safety_score").map_err(&get_err)?,
        rating,
        feedback: row.try_get("feedback").map_err(&get_err)?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        version: version.max(0) as u64,
    })
}
