//! PostgreSQL implementation of SessionReportRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, QuestionId, SessionReportId, Timestamp,
};
use crate::domain::question::{QaEntry, ReportStatus, SessionReport};
use crate::ports::SessionReportRepository;

use super::{corrupt_row, db_error, is_unique_violation};

#[derive(Clone)]
pub struct PostgresSessionReportRepository {
    pool: PgPool,
}

impl PostgresSessionReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn history_json(report: &SessionReport) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(&report.qa_history)
        .map_err(|e| DomainError::database(format!("Failed to encode transcript: {}", e)))
}

#[async_trait]
impl SessionReportRepository for PostgresSessionReportRepository {
    async fn save(&self, report: &SessionReport) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO session_reports (
                id, question_id, expert_id, summary, status, qa_history, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(report.question_id.as_uuid())
        .bind(report.expert_id.as_uuid())
        .bind(&report.summary)
        .bind(report.status.as_str())
        .bind(history_json(report)?)
        .bind(report.created_at.as_datetime())
        .bind(report.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(
                    ErrorCode::ReportAlreadyExists,
                    "Session report already exists for this question",
                )
            } else {
                db_error("insert session report")(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, report: &SessionReport) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE session_reports SET
                summary = $2,
                status = $3,
                qa_history = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(&report.summary)
        .bind(report.status.as_str())
        .bind(history_json(report)?)
        .bind(report.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update session report"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionReportNotFound,
                format!("Session report not found: {}", report.id),
            ));
        }
        Ok(())
    }

    async fn find_by_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<SessionReport>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, question_id, expert_id, summary, status, qa_history, created_at, updated_at
            FROM session_reports
            WHERE question_id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch session report"))?;

        row.as_ref().map(row_to_report).transpose()
    }

    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM session_reports WHERE question_id = $1")
            .bind(question_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete session report"))?;
        Ok(())
    }
}

fn parse_status(raw: &str) -> Result<ReportStatus, DomainError> {
    match raw {
        "Draft" => Ok(ReportStatus::Draft),
        "Approved" => Ok(ReportStatus::Approved),
        other => Err(corrupt_row("status", other)),
    }
}

fn row_to_report(row: &PgRow) -> Result<SessionReport, DomainError> {
    let get_err = db_error("decode session report row");

    let status: String = row.try_get("status").map_err(&get_err)?;
    let history: serde_json::Value = row.try_get("qa_history").map_err(&get_err)?;
    let qa_history: Vec<QaEntry> =
        serde_json::from_value(history).map_err(|e| corrupt_row("qa_history", e))?;

    let id: uuid::Uuid = row.try_get("id").map_err(&get_err)?;
    let question_id: uuid::Uuid = row.try_get("question_id").map_err(&get_err)?;
    let expert_id: uuid::Uuid = row.try_get("expert_id").map_err(&get_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(&get_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(&get_err)?;

    Ok(SessionReport {
        id: SessionReportId::from_uuid(id),
        question_id: QuestionId::from_uuid(question_id),
        expert_id: AccountId::from_uuid(expert_id),
        summary: row.try_get("summary").map_err(&get_err)?,
        status: parse_status(&status)?,
        qa_history,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_status_round_trips_through_column_text() {
        for status in [ReportStatus::Draft, ReportStatus::Approved] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
        assert!(parse_status("archived").is_err());
    }
}
