//! Session report handlers: create, approve and read.

use std::sync::Arc;

use crate::application::lookup::load_question;
use crate::application::{Actor, EngineError};
use crate::domain::foundation::{DomainError, ErrorCode, QuestionId};
use crate::domain::question::SessionReport;
use crate::ports::{
    AccountRepository, QuestionRepository, ResponseRepository, SessionReportRepository,
};

use super::assigned_question;

fn report_not_found(question_id: QuestionId) -> DomainError {
    DomainError::new(
        ErrorCode::SessionReportNotFound,
        format!("No session report for question {}", question_id),
    )
}

#[derive(Debug, Clone)]
pub struct CreateSessionReportCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
    pub summary: String,
}

/// Snapshots the conversation into a draft report. Once per question.
pub struct CreateSessionReportHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    reports: Arc<dyn SessionReportRepository>,
}

impl CreateSessionReportHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        reports: Arc<dyn SessionReportRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
            responses,
            reports,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionReportCommand,
    ) -> Result<SessionReport, EngineError> {
        let summary = cmd.summary.trim().to_string();
        if summary.is_empty() {
            return Err(EngineError::validation("Report summary is required"));
        }

        let question = assigned_question(
            self.accounts.as_ref(),
            self.questions.as_ref(),
            cmd.actor,
            cmd.question_id,
        )
        .await?;
        if self.reports.find_by_question(&question.id).await?.is_some() {
            return Err(EngineError::conflict(
                "A session report already exists for this question",
            ));
        }

        let responses = self.responses.find_by_question(&question.id).await?;
        let report = SessionReport::draft(&question, &responses, cmd.actor.account_id, summary);
        self.reports.save(&report).await?;

        tracing::info!(
            question_id = %question.id,
            report_id = %report.id,
            entries = report.qa_history.len(),
            "session report drafted"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone)]
pub struct ApproveSessionReportCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
}

/// Moves the author's draft to Approved.
pub struct ApproveSessionReportHandler {
    accounts: Arc<dyn AccountRepository>,
    reports: Arc<dyn SessionReportRepository>,
}

impl ApproveSessionReportHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        reports: Arc<dyn SessionReportRepository>,
    ) -> Self {
        Self { accounts, reports }
    }

    pub async fn handle(
        &self,
        cmd: ApproveSessionReportCommand,
    ) -> Result<SessionReport, EngineError> {
        cmd.actor.load_account(self.accounts.as_ref()).await?;
        let mut report = self
            .reports
            .find_by_question(&cmd.question_id)
            .await?
            .ok_or_else(|| report_not_found(cmd.question_id))?;
        if report.expert_id != cmd.actor.account_id {
            return Err(EngineError::forbidden("Only the report author can approve it"));
        }

        report.approve()?;
        self.reports.update(&report).await?;
        Ok(report)
    }
}

#[derive(Debug, Clone)]
pub struct GetSessionReportQuery {
    pub actor: Actor,
    pub question_id: QuestionId,
}

/// Visible to the asker, the assigned expert and admins.
pub struct GetSessionReportHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    reports: Arc<dyn SessionReportRepository>,
}

impl GetSessionReportHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        reports: Arc<dyn SessionReportRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
            reports,
        }
    }

    pub async fn handle(&self, query: GetSessionReportQuery) -> Result<SessionReport, EngineError> {
        query.actor.load_account(self.accounts.as_ref()).await?;
        let question = load_question(self.questions.as_ref(), query.question_id).await?;
        let id = query.actor.account_id;
        if !(question.is_owned_by(id) || question.is_assigned_to(id) || query.actor.is_admin()) {
            return Err(EngineError::forbidden("You are not part of this conversation"));
        }

        let report = self
            .reports
            .find_by_question(&question.id)
            .await?
            .ok_or_else(|| report_not_found(question.id))?;
        Ok(report)
    }
}
