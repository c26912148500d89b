//! Shared fixture for handler tests: in-memory ports and scripted classifiers.

use std::sync::Arc;

use crate::adapters::ai::MockAIProvider;
use crate::adapters::memory::{
    InMemoryAccountRepository, InMemoryQuestionRepository, InMemoryResponseRepository,
    InMemorySessionReportRepository,
};
use crate::adapters::notifications::RecordingNotificationBus;
use crate::domain::account::{Account, ExpertDecision, FlagLedger};
use crate::domain::foundation::{AccountId, QuestionId, Timestamp};
use crate::domain::moderation::{Category, Verdict};
use crate::domain::question::Question;
use crate::ports::{AccountRepository, QuestionRepository};

use super::{AccountLedger, ContentCleanup, ModerationGate, Notifier, RoutingEngine};

pub const SAFE_REPLY: &str =
    r#"{"isSafe": true, "rejectionType": null, "reason": "ok", "category": "General"}"#;

pub fn safe_reply(category: &str) -> String {
    format!(
        r#"{{"isSafe": true, "rejectionType": null, "reason": "ok", "category": "{}"}}"#,
        category
    )
}

pub fn unsafe_reply(rejection_type: &str, category: &str) -> String {
    format!(
        r#"{{"isSafe": false, "rejectionType": "{}", "reason": "policy", "category": "{}"}}"#,
        rejection_type, category
    )
}

pub struct Harness {
    pub accounts: Arc<InMemoryAccountRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub responses: Arc<InMemoryResponseRepository>,
    pub reports: Arc<InMemorySessionReportRepository>,
    pub bus: RecordingNotificationBus,
    pub classifier: MockAIProvider,
    pub assistant: MockAIProvider,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            responses: Arc::new(InMemoryResponseRepository::new()),
            reports: Arc::new(InMemorySessionReportRepository::new()),
            bus: RecordingNotificationBus::new(),
            classifier: MockAIProvider::new().always_respond(SAFE_REPLY),
            assistant: MockAIProvider::new().always_respond("Suggested text"),
        }
    }

    pub fn with_classifier(mut self, classifier: MockAIProvider) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_assistant(mut self, assistant: MockAIProvider) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(Arc::new(self.bus.clone()))
    }

    pub fn gate(&self) -> Arc<ModerationGate> {
        Arc::new(ModerationGate::new(Arc::new(self.classifier.clone())))
    }

    pub fn routing(&self) -> Arc<RoutingEngine> {
        Arc::new(RoutingEngine::new(self.accounts.clone()))
    }

    pub fn ledger(&self) -> Arc<AccountLedger> {
        Arc::new(AccountLedger::new(self.accounts.clone(), FlagLedger::default()))
    }

    pub fn cleanup(&self) -> ContentCleanup {
        ContentCleanup::new(
            self.questions.clone(),
            self.responses.clone(),
            self.reports.clone(),
            self.notifier(),
        )
    }

    pub async fn account(&self, id: AccountId) -> Account {
        self.accounts.find_by_id(&id).await.unwrap().unwrap()
    }

    pub async fn stored_question(&self, id: QuestionId) -> Option<Question> {
        self.questions.find_by_id(&id).await.unwrap()
    }

    pub async fn asker(&self) -> AccountId {
        let asker = Account::new_asker(AccountId::new(), "anon");
        self.accounts.save(&asker).await.unwrap();
        asker.id
    }

    pub async fn admin(&self) -> AccountId {
        let admin = Account::new_admin(AccountId::new(), "admin");
        self.accounts.save(&admin).await.unwrap();
        admin.id
    }

    /// Approved expert created `age_secs` ago.
    pub async fn expert_aged(&self, category: Category, online: bool, age_secs: i64) -> AccountId {
        let mut expert = Account::new_expert(AccountId::new(), "expert", category)
            .created_at(Timestamp::now().plus_secs(-age_secs));
        expert.review_application(ExpertDecision::Approve).unwrap();
        expert.set_online(online).unwrap();
        self.accounts.save(&expert).await.unwrap();
        expert.id
    }

    pub async fn expert(&self, category: Category, online: bool) -> AccountId {
        self.expert_aged(category, online, 0).await
    }

    pub async fn pending_expert(&self, category: Category) -> AccountId {
        let expert = Account::new_expert(AccountId::new(), "applicant", category);
        self.accounts.save(&expert).await.unwrap();
        expert.id
    }

    /// Saved safe question, optionally assigned.
    pub async fn question(&self, asker: AccountId, expert: Option<AccountId>) -> Question {
        let mut question = Question::from_verdict(
            QuestionId::new(),
            asker,
            "How should I prepare for a salary negotiation?".into(),
            Category::Career,
            None,
            &Verdict::safe(Category::Career, "ok"),
        );
        if let Some(expert) = expert {
            question.assign_expert(expert);
        }
        self.questions.save(&question).await.unwrap();
        question
    }
}
