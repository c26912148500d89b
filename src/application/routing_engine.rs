//! RoutingEngine - assigns a safe question to an expert.
//!
//! Walks the fallback chain against the expert directory. Finding nobody is
//! a normal outcome: the question stays unassigned and pending.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::moderation::Category;
use crate::domain::routing::{lookup_plan, Assignment};
use crate::ports::ExpertDirectory;

pub struct RoutingEngine {
    directory: Arc<dyn ExpertDirectory>,
}

impl RoutingEngine {
    pub fn new(directory: Arc<dyn ExpertDirectory>) -> Self {
        Self { directory }
    }

    pub async fn assign(&self, category: Category) -> Result<Option<Assignment>, DomainError> {
        for (step, criteria) in lookup_plan(category) {
            if let Some(expert_id) = self.directory.find_newest_expert(&criteria).await? {
                tracing::info!(
                    category = category.as_str(),
                    matched = ?criteria.category.map(|c| c.as_str()),
                    step = ?step,
                    expert_id = %expert_id,
                    "expert assigned"
                );
                return Ok(Some(Assignment { expert_id, step }));
            }
        }

        tracing::info!(category = category.as_str(), "no verified expert available");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountRepository;
    use crate::domain::routing::FallbackStep;
    use crate::domain::account::{Account, ExpertDecision};
    use crate::domain::foundation::{AccountId, Timestamp};
    use crate::ports::AccountRepository;

    async fn add_expert(
        repo: &InMemoryAccountRepository,
        category: Category,
        online: bool,
        age_secs: i64,
        decision: Option<ExpertDecision>,
    ) -> AccountId {
        let mut expert = Account::new_expert(AccountId::new(), "expert", category)
            .created_at(Timestamp::now().plus_secs(-age_secs));
        if let Some(d) = decision {
            expert.review_application(d).unwrap();
        }
        if expert.is_routable_expert() {
            expert.set_online(online).unwrap();
        }
        repo.save(&expert).await.unwrap();
        expert.id
    }

    #[tokio::test]
    async fn online_expert_in_category_first() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let online = add_expert(&repo, Category::Career, true, 100, Some(ExpertDecision::Approve)).await;
        add_expert(&repo, Category::Career, false, 10, Some(ExpertDecision::Approve)).await;

        let engine = RoutingEngine::new(repo);
        let assignment = engine.assign(Category::Career).await.unwrap().unwrap();
        assert_eq!(assignment.expert_id, online);
        assert_eq!(assignment.step, FallbackStep::ExactCategoryOnline);
    }

    #[tokio::test]
    async fn general_expert_when_category_empty() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let general = add_expert(&repo, Category::General, true, 10, Some(ExpertDecision::Approve)).await;

        let engine = RoutingEngine::new(repo);
        let assignment = engine.assign(Category::Career).await.unwrap().unwrap();
        assert_eq!(assignment.expert_id, general);
        assert_eq!(assignment.step, FallbackStep::GeneralCategory);
    }

    #[tokio::test]
    async fn mental_health_routes_to_health_experts() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let health = add_expert(&repo, Category::Health, true, 10, Some(ExpertDecision::Approve)).await;

        let engine = RoutingEngine::new(repo);
        let assignment = engine.assign(Category::MentalHealth).await.unwrap().unwrap();
        assert_eq!(assignment.expert_id, health);
        assert_eq!(assignment.step, FallbackStep::ExactCategoryOnline);
    }

    #[tokio::test]
    async fn mental_health_expert_is_matched_before_general() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mental = add_expert(&repo, Category::MentalHealth, true, 100, Some(ExpertDecision::Approve)).await;
        add_expert(&repo, Category::General, true, 10, Some(ExpertDecision::Approve)).await;

        let engine = RoutingEngine::new(repo);
        let assignment = engine.assign(Category::MentalHealth).await.unwrap().unwrap();
        assert_eq!(assignment.expert_id, mental);
        assert_eq!(assignment.step, FallbackStep::ExactCategoryOnline);
    }

    #[tokio::test]
    async fn unverified_and_rejected_experts_are_never_chosen() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        add_expert(&repo, Category::Career, true, 10, None).await;
        add_expert(
            &repo,
            Category::Career,
            true,
            5,
            Some(ExpertDecision::Reject { reason: None }),
        )
        .await;

        let engine = RoutingEngine::new(repo);
        assert!(engine.assign(Category::Career).await.unwrap().is_none());
    }
}
