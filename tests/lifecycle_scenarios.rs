//! End-to-end scenarios through the engine's public API.
//!
//! Uses in-memory storage, a scripted classifier and a recording bus, so
//! every path from submission to admin review runs without external services.

use std::sync::Arc;

use whisper_engine::adapters::ai::{MockAIProvider, MockError};
use whisper_engine::adapters::memory::{
    InMemoryAccountRepository, InMemoryQuestionRepository, InMemoryResponseRepository,
    InMemorySessionReportRepository,
};
use whisper_engine::adapters::notifications::RecordingNotificationBus;
use whisper_engine::application::handlers::{
    AdminQuery, BanAccountCommand, CheckLoginAccessQuery, ExpertAnalyticsQuery,
    GetQuestionThreadQuery, ListMyQuestionsQuery, RateAnswerCommand, RegisterAccountCommand,
    ReplyToQuestionCommand, ResolveFlaggedQuestionCommand, SetOnlineStatusCommand,
    SubmitQuestionCommand, VerifyExpertCommand,
};
use whisper_engine::application::{Actor, Engine, EnginePolicy, EnginePorts, ErrorKind};
use whisper_engine::domain::account::{AccessDecision, Account, ExpertDecision, Role};
use whisper_engine::domain::foundation::AccountId;
use whisper_engine::domain::moderation::Category;
use whisper_engine::domain::question::{QuestionStatus, ResolveAction};
use whisper_engine::ports::AccountRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SAFE_CAREER: &str =
    r#"{"isSafe": true, "rejectionType": null, "reason": "ok", "category": "Career"}"#;
const SPAM: &str =
    r#"{"isSafe": false, "rejectionType": "Spam", "reason": "advertising", "category": "General"}"#;

struct World {
    engine: Engine,
    accounts: Arc<InMemoryAccountRepository>,
    bus: RecordingNotificationBus,
}

impl World {
    fn new(classifier: MockAIProvider) -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let bus = RecordingNotificationBus::new();
        let ports = EnginePorts {
            accounts: accounts.clone(),
            directory: accounts.clone(),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            responses: Arc::new(InMemoryResponseRepository::new()),
            reports: Arc::new(InMemorySessionReportRepository::new()),
            classifier: Arc::new(classifier),
            assistant: Arc::new(MockAIProvider::new().always_respond("Try a structured plan.")),
            bus: Arc::new(bus.clone()),
        };
        Self {
            engine: Engine::new(ports, EnginePolicy::default()),
            accounts,
            bus,
        }
    }

    async fn seed_admin(&self) -> Actor {
        let admin = Account::new_admin(AccountId::new(), "Ops");
        self.accounts.save(&admin).await.unwrap();
        Actor::admin(admin.id)
    }

    async fn register(&self, name: &str, role: Role, category: Option<Category>) -> Actor {
        let account = self
            .engine
            .register_account
            .handle(RegisterAccountCommand {
                display_name: name.into(),
                role,
                category,
                created_by: None,
            })
            .await
            .unwrap();
        Actor::new(account.id, role)
    }

    async fn onboard_expert(&self, admin: Actor, category: Category) -> Actor {
        let expert = self.register("Dana", Role::Expert, Some(category)).await;
        self.engine
            .verify_expert
            .handle(VerifyExpertCommand {
                actor: admin,
                expert_id: expert.account_id,
                decision: ExpertDecision::Approve,
            })
            .await
            .unwrap();
        self.engine
            .set_online_status
            .handle(SetOnlineStatusCommand {
                actor: expert,
                is_online: true,
            })
            .await
            .unwrap();
        expert
    }

    async fn submit(&self, asker: Actor, content: &str) -> Result<QuestionStatus, ErrorKind> {
        self.engine
            .submit_question
            .handle(SubmitQuestionCommand {
                actor: asker,
                content: content.into(),
                category: None,
                attachment: None,
            })
            .await
            .map(|r| r.question.status)
            .map_err(|e| e.kind())
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn question_is_routed_answered_and_rated() {
    let world = World::new(MockAIProvider::new().always_respond(SAFE_CAREER));
    let admin = world.seed_admin().await;
    let expert = world.onboard_expert(admin, Category::Career).await;
    let asker = world.register("anon", Role::Asker, None).await;

    let submitted = world
        .engine
        .submit_question
        .handle(SubmitQuestionCommand {
            actor: asker,
            content: "How do I ask for a raise?".into(),
            category: None,
            attachment: None,
        })
        .await
        .unwrap();
    let question_id = submitted.question.id;
    assert_eq!(submitted.question.category, Category::Career);
    assert_eq!(submitted.question.expert_id, Some(expert.account_id));

    let inbox = world
        .engine
        .list_my_questions
        .handle(ListMyQuestionsQuery { actor: expert })
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);

    let reply = world
        .engine
        .reply_to_question
        .handle(ReplyToQuestionCommand {
            actor: expert,
            question_id,
            content: "Bring evidence of your impact.".into(),
        })
        .await
        .unwrap();
    assert_eq!(reply.status, Some(QuestionStatus::Answered));

    world
        .engine
        .rate_answer
        .handle(RateAnswerCommand {
            actor: asker,
            question_id,
            rating: 5,
            feedback: Some("Helpful".into()),
        })
        .await
        .unwrap();

    let thread = world
        .engine
        .question_thread
        .handle(GetQuestionThreadQuery {
            actor: asker,
            question_id,
        })
        .await
        .unwrap();
    assert_eq!(thread.question.status, QuestionStatus::Answered);
    assert_eq!(thread.responses.len(), 1);

    let analytics = world
        .engine
        .expert_analytics
        .handle(ExpertAnalyticsQuery { actor: expert })
        .await
        .unwrap();
    assert_eq!(analytics.answered, 1);
    assert_eq!(analytics.average_rating, Some(5.0));

    let events = world.bus.names();
    assert!(events.contains(&"new_question"));
    assert!(events.contains(&"new_message"));
    assert_eq!(events.last(), Some(&"rating_updated"));
}

#[tokio::test]
async fn three_strikes_flag_the_asker_and_a_ban_ends_access() {
    let world = World::new(MockAIProvider::new().always_respond(SPAM));
    let admin = world.seed_admin().await;
    let asker = world.register("spammer", Role::Asker, None).await;

    let mut last_notice = None;
    for _ in 0..3 {
        let err = world
            .engine
            .submit_question
            .handle(SubmitQuestionCommand {
                actor: asker,
                content: "Buy cheap followers now".into(),
                category: None,
                attachment: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        last_notice = err.strike_notice().cloned();
    }
    let notice = last_notice.unwrap();
    assert_eq!(notice.flag_count, 3);
    assert!(notice.is_flagged);
    assert!(notice.quarantined_question.is_some());
    assert!(world.bus.names().is_empty());

    let admin_query = AdminQuery { actor: admin };
    let flagged = world
        .engine
        .admin_queries
        .flagged_accounts(admin_query.clone())
        .await
        .unwrap();
    assert_eq!(flagged[0].id, asker.account_id);
    assert_eq!(
        world
            .engine
            .admin_queries
            .flagged_questions(admin_query)
            .await
            .unwrap()
            .len(),
        3
    );

    let ban = world
        .engine
        .ban_account
        .handle(BanAccountCommand {
            actor: admin,
            account_id: asker.account_id,
            reason: "Repeated spam".into(),
        })
        .await
        .unwrap();
    assert_eq!(ban.questions_removed, 3);

    let access = world
        .engine
        .check_login_access
        .handle(CheckLoginAccessQuery {
            account_id: asker.account_id,
        })
        .await
        .unwrap();
    assert!(!access.allowed);
    assert_eq!(access.decision, AccessDecision::Banned);
}

#[tokio::test]
async fn quarantined_question_is_routed_once_allowed() {
    let classifier = MockAIProvider::new()
        .with_response(SPAM)
        .always_respond(SAFE_CAREER);
    let world = World::new(classifier);
    let admin = world.seed_admin().await;
    let asker = world.register("anon", Role::Asker, None).await;

    let err = world
        .engine
        .submit_question
        .handle(SubmitQuestionCommand {
            actor: asker,
            content: "Is this link a good job board?".into(),
            category: Some(Category::Career),
            attachment: None,
        })
        .await
        .unwrap_err();
    let question_id = err.strike_notice().unwrap().quarantined_question.unwrap();

    let expert = world.onboard_expert(admin, Category::Career).await;
    world.bus.clear();

    let resolved = world
        .engine
        .resolve_flagged_question
        .handle(ResolveFlaggedQuestionCommand {
            actor: admin,
            question_id,
            action: ResolveAction::Allow,
        })
        .await
        .unwrap();

    assert!(!resolved.is_flagged);
    assert_eq!(resolved.expert_id, Some(expert.account_id));
    assert_eq!(world.bus.names(), vec!["new_question"]);
}

#[tokio::test]
async fn classifier_outage_rejects_submission_without_side_effects() {
    let world = World::new(MockAIProvider::new().always_error(MockError::Unavailable {
        message: "overloaded".into(),
    }));
    let asker = world.register("anon", Role::Asker, None).await;

    let kind = world.submit(asker, "Can I negotiate remote work?").await.unwrap_err();
    assert_eq!(kind, ErrorKind::ServiceUnavailable);

    let mine = world
        .engine
        .list_my_questions
        .handle(ListMyQuestionsQuery { actor: asker })
        .await
        .unwrap();
    assert!(mine.is_empty());
    assert_eq!(world.accounts.find_by_id(&asker.account_id).await.unwrap().unwrap().flag_count(), 0);
}

#[tokio::test]
async fn pending_expert_cannot_log_in_until_approved() {
    let world = World::new(MockAIProvider::new().always_respond(SAFE_CAREER));
    let admin = world.seed_admin().await;
    let applicant = world
        .register("applicant", Role::Expert, Some(Category::Legal))
        .await;

    let check = CheckLoginAccessQuery {
        account_id: applicant.account_id,
    };
    let before = world.engine.check_login_access.handle(check.clone()).await.unwrap();
    assert_eq!(before.decision, AccessDecision::AwaitingVerification);

    world
        .engine
        .verify_expert
        .handle(VerifyExpertCommand {
            actor: admin,
            expert_id: applicant.account_id,
            decision: ExpertDecision::Approve,
        })
        .await
        .unwrap();

    let after = world.engine.check_login_access.handle(check).await.unwrap();
    assert!(after.allowed);
}

#[tokio::test]
async fn unrouted_question_stays_pending_without_experts() {
    let world = World::new(MockAIProvider::new().always_respond(SAFE_CAREER));
    let asker = world.register("anon", Role::Asker, None).await;

    let status = world.submit(asker, "Where do I start?").await.unwrap();
    assert_eq!(status, QuestionStatus::Pending);
    assert_eq!(world.bus.names(), vec!["new_question"]);
}
