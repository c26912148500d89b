//! Expert routing policy.
//!
//! A safe question is offered to experts through an ordered chain of
//! progressively looser criteria. Each step picks the newest matching
//! expert; the chain stops at the first step with a candidate.

use serde::Serialize;

use crate::domain::account::Account;
use crate::domain::foundation::AccountId;
use crate::domain::moderation::Category;

/// Filter applied to routable (approved, non-deleted) experts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpertCriteria {
    /// `None` matches every category.
    pub category: Option<Category>,
    pub online_only: bool,
}

impl ExpertCriteria {
    pub fn matches(&self, account: &Account) -> bool {
        if !account.is_routable_expert() {
            return false;
        }
        let Some(profile) = account.expert_profile() else {
            return false;
        };
        let category_ok = self.category.map_or(true, |c| profile.category == c);
        let online_ok = !self.online_only || profile.is_online;
        category_ok && online_ok
    }
}

/// One step of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStep {
    ExactCategoryOnline,
    ExactCategory,
    GeneralCategory,
    AnyVerified,
}

impl FallbackStep {
    /// Steps in the order they are tried.
    pub const CHAIN: [FallbackStep; 4] = [
        FallbackStep::ExactCategoryOnline,
        FallbackStep::ExactCategory,
        FallbackStep::GeneralCategory,
        FallbackStep::AnyVerified,
    ];

    pub fn criteria(&self, category: Category) -> ExpertCriteria {
        match self {
            FallbackStep::ExactCategoryOnline => ExpertCriteria {
                category: Some(category),
                online_only: true,
            },
            FallbackStep::ExactCategory => ExpertCriteria {
                category: Some(category),
                online_only: false,
            },
            FallbackStep::GeneralCategory => ExpertCriteria {
                category: Some(Category::General),
                online_only: false,
            },
            FallbackStep::AnyVerified => ExpertCriteria {
                category: None,
                online_only: false,
            },
        }
    }
}

/// Every lookup for `requested`, in the order it is tried.
///
/// Exact-category steps try the requested category before the category
/// whose experts also cover it, so a mental health expert is preferred to a
/// health expert for a mental health question.
pub fn lookup_plan(requested: Category) -> Vec<(FallbackStep, ExpertCriteria)> {
    let mut exact = vec![requested];
    let covering = requested.routing_category();
    if covering != requested {
        exact.push(covering);
    }

    let mut plan = Vec::with_capacity(FallbackStep::CHAIN.len() + exact.len());
    for step in FallbackStep::CHAIN {
        match step {
            FallbackStep::ExactCategoryOnline | FallbackStep::ExactCategory => {
                plan.extend(exact.iter().map(|c| (step, step.criteria(*c))));
            }
            FallbackStep::GeneralCategory | FallbackStep::AnyVerified => {
                plan.push((step, step.criteria(requested)));
            }
        }
    }
    plan
}

/// The expert chosen for a question and the step that found them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub expert_id: AccountId,
    pub step: FallbackStep,
}

/// Picks the most recently created expert matching `criteria`.
///
/// Ties on creation time fall back to the larger id so the result is stable.
pub fn newest_matching<'a, I>(experts: I, criteria: &ExpertCriteria) -> Option<&'a Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    experts
        .into_iter()
        .filter(|a| criteria.matches(a))
        .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
}

/// Runs the whole chain over an in-memory expert list.
pub fn route_among(experts: &[Account], category: Category) -> Option<Assignment> {
    lookup_plan(category).into_iter().find_map(|(step, criteria)| {
        newest_matching(experts, &criteria).map(|a| Assignment {
            expert_id: a.id,
            step,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::ExpertDecision;
    use crate::domain::foundation::Timestamp;

    fn expert(category: Category, online: bool, age_secs: i64) -> Account {
        let mut a = Account::new_expert(AccountId::new(), "expert", category)
            .created_at(Timestamp::now().plus_secs(-age_secs));
        a.review_application(ExpertDecision::Approve).unwrap();
        a.set_online(online).unwrap();
        a
    }

    #[test]
    fn online_exact_match_wins_over_newer_offline() {
        let online = expert(Category::Career, true, 100);
        let offline = expert(Category::Career, false, 10);
        let picked = route_among(&[offline, online.clone()], Category::Career).unwrap();
        assert_eq!(picked.expert_id, online.id);
        assert_eq!(picked.step, FallbackStep::ExactCategoryOnline);
    }

    #[test]
    fn newest_offline_exact_match_when_nobody_online() {
        let older = expert(Category::Legal, false, 100);
        let newer = expert(Category::Legal, false, 10);
        let picked = route_among(&[older, newer.clone()], Category::Legal).unwrap();
        assert_eq!(picked.expert_id, newer.id);
        assert_eq!(picked.step, FallbackStep::ExactCategory);
    }

    #[test]
    fn falls_back_to_general() {
        let general = expert(Category::General, true, 10);
        let health = expert(Category::Health, true, 5);
        let picked = route_among(&[health, general.clone()], Category::Career).unwrap();
        assert_eq!(picked.expert_id, general.id);
        assert_eq!(picked.step, FallbackStep::GeneralCategory);
    }

    #[test]
    fn falls_back_to_any_verified() {
        let finance = expert(Category::Finance, false, 10);
        let picked = route_among(&[finance.clone()], Category::Career).unwrap();
        assert_eq!(picked.expert_id, finance.id);
        assert_eq!(picked.step, FallbackStep::AnyVerified);
    }

    #[test]
    fn mental_health_expert_wins_over_health_and_general() {
        let mental = expert(Category::MentalHealth, true, 100);
        let health = expert(Category::Health, true, 50);
        let general = expert(Category::General, true, 10);
        let picked = route_among(
            &[general, health.clone(), mental.clone()],
            Category::MentalHealth,
        )
        .unwrap();
        assert_eq!(picked.expert_id, mental.id);
        assert_eq!(picked.step, FallbackStep::ExactCategoryOnline);

        let picked = route_among(&[health.clone()], Category::MentalHealth).unwrap();
        assert_eq!(picked.expert_id, health.id);
    }

    #[test]
    fn online_health_expert_beats_offline_mental_health_expert() {
        let offline = expert(Category::MentalHealth, false, 10);
        let health = expert(Category::Health, true, 100);
        let picked = route_among(&[offline, health.clone()], Category::MentalHealth).unwrap();
        assert_eq!(picked.expert_id, health.id);
        assert_eq!(picked.step, FallbackStep::ExactCategoryOnline);
    }

    #[test]
    fn plan_without_covering_category_has_one_lookup_per_step() {
        let steps: Vec<_> = lookup_plan(Category::Career).into_iter().map(|(s, _)| s).collect();
        assert_eq!(steps, FallbackStep::CHAIN.to_vec());
        assert_eq!(lookup_plan(Category::MentalHealth).len(), 6);
    }

    #[test]
    fn deleted_and_unverified_experts_are_never_chosen() {
        let mut deleted = expert(Category::Career, true, 10);
        deleted.soft_delete(Timestamp::now());
        let pending = Account::new_expert(AccountId::new(), "new", Category::Career);
        assert!(route_among(&[deleted, pending], Category::Career).is_none());
    }

    #[test]
    fn askers_do_not_match_any_criteria() {
        let asker = Account::new_asker(AccountId::new(), "anon");
        let criteria = FallbackStep::AnyVerified.criteria(Category::General);
        assert!(!criteria.matches(&asker));
    }
}
