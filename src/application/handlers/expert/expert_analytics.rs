//! ExpertAnalyticsHandler - an expert's workload and rating figures.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::{Actor, EngineError};
use crate::domain::account::Role;
use crate::domain::question::{Question, QuestionStatus};
use crate::ports::{AccountRepository, QuestionRepository};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertAnalytics {
    pub total_assigned: u64,
    pub answered: u64,
    pub pending: u64,
    pub rating_count: u64,
    /// Mean of received ratings, rounded to one decimal.
    pub average_rating: Option<f64>,
    pub answered_by_category: BTreeMap<String, u64>,
}

impl ExpertAnalytics {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut analytics = ExpertAnalytics {
            total_assigned: questions.len() as u64,
            ..Default::default()
        };
        let mut rating_sum = 0u64;

        for q in questions {
            if q.status == QuestionStatus::Answered {
                analytics.answered += 1;
                *analytics
                    .answered_by_category
                    .entry(q.category.as_str().to_string())
                    .or_default() += 1;
            }
            if q.status.is_awaiting_answer() {
                analytics.pending += 1;
            }
            if let Some(rating) = q.rating {
                analytics.rating_count += 1;
                rating_sum += u64::from(rating.value());
            }
        }

        if analytics.rating_count > 0 {
            let mean = rating_sum as f64 / analytics.rating_count as f64;
            analytics.average_rating = Some((mean * 10.0).round() / 10.0);
        }
        analytics
    }
}

#[derive(Debug, Clone)]
pub struct ExpertAnalyticsQuery {
    pub actor: Actor,
}

pub struct ExpertAnalyticsHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl ExpertAnalyticsHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
        }
    }

    pub async fn handle(&self, query: ExpertAnalyticsQuery) -> Result<ExpertAnalytics, EngineError> {
        query.actor.require(Role::Expert)?;
        query.actor.load_account(self.accounts.as_ref()).await?;
        let assigned = self.questions.find_by_expert(&query.actor.account_id).await?;
        Ok(ExpertAnalytics::from_questions(&assigned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Harness;
    use crate::domain::moderation::Category;
    use crate::domain::question::Rating;

    #[tokio::test]
    async fn counts_statuses_and_averages_ratings() {
        let h = Harness::new();
        let expert = h.expert(Category::Career, true).await;
        h.question(h.asker().await, Some(expert)).await;
        for stars in [4, 5] {
            let mut q = h.question(h.asker().await, Some(expert)).await;
            q.record_expert_reply().unwrap();
            q.rate(Rating::new(stars).unwrap(), None).unwrap();
            h.questions.update(&q).await.unwrap();
        }
        let handler = ExpertAnalyticsHandler::new(h.accounts.clone(), h.questions.clone());

        let stats = handler
            .handle(ExpertAnalyticsQuery {
                actor: Actor::expert(expert),
            })
            .await
            .unwrap();

        assert_eq!(stats.total_assigned, 3);
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.rating_count, 2);
        assert_eq!(stats.average_rating, Some(4.5));
        assert_eq!(stats.answered_by_category.get("Career"), Some(&2));
    }

    #[test]
    fn no_ratings_means_no_average() {
        let stats = ExpertAnalytics::from_questions(&[]);
        assert_eq!(stats, ExpertAnalytics::default());
        assert!(stats.average_rating.is_none());
    }
}
