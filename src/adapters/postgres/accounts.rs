//! PostgreSQL implementation of AccountRepository and ExpertDirectory.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::account::{
    Account, ExpertProfile, ExpertStatus, FlagRecord, Role, RoleProfile, FLAG_THRESHOLD,
};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::domain::moderation::Category;
use crate::domain::routing::ExpertCriteria;
use crate::ports::{AccountRepository, ExpertDirectory};

use super::{corrupt_row, db_error, is_unique_violation};

const COLUMNS: &str = "id, display_name, role, expert_category, expert_status, is_online, \
     rejection_reason, flag_count, flag_reasons, deleted_at, created_at, updated_at, version";

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        filter: &str,
        context: &'static str,
    ) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM accounts WHERE {}", COLUMNS, filter))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(context))?;
        rows.iter().map(row_to_account).collect()
    }
}

/// Expert columns as stored; all `None` for askers and admins.
struct ExpertColumns<'a> {
    category: Option<&'a str>,
    status: Option<&'a str>,
    is_online: bool,
    rejection_reason: Option<&'a str>,
}

fn expert_columns(account: &Account) -> ExpertColumns<'_> {
    match account.expert_profile() {
        Some(p) => ExpertColumns {
            category: Some(p.category.as_str()),
            status: Some(p.status.as_str()),
            is_online: p.is_online,
            rejection_reason: p.rejection_reason.as_deref(),
        },
        None => ExpertColumns {
            category: None,
            status: None,
            is_online: false,
            rejection_reason: None,
        },
    }
}

fn flag_reasons_json(account: &Account) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(account.flag_reasons())
        .map_err(|e| DomainError::database(format!("Failed to encode flag history: {}", e)))
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn save(&self, account: &Account) -> Result<(), DomainError> {
        let expert = expert_columns(account);
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, display_name, role, expert_category, expert_status, is_online,
                rejection_reason, flag_count, flag_reasons, deleted_at, created_at,
                updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.display_name)
        .bind(account.role().as_str())
        .bind(expert.category)
        .bind(expert.status)
        .bind(expert.is_online)
        .bind(expert.rejection_reason)
        .bind(account.flag_count() as i32)
        .bind(flag_reasons_json(account)?)
        .bind(account.deleted_at.map(|t| *t.as_datetime()))
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .bind(account.version as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!("Account {} already exists", account.id),
                )
            } else {
                db_error("insert account")(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let expert = expert_columns(account);
        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                display_name = $2,
                expert_category = $3,
                expert_status = $4,
                is_online = $5,
                rejection_reason = $6,
                flag_count = $7,
                flag_reasons = $8,
                deleted_at = $9,
                updated_at = $10,
                version = version + 1
            WHERE id = $1 AND version = $11
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.display_name)
        .bind(expert.category)
        .bind(expert.status)
        .bind(expert.is_online)
        .bind(expert.rejection_reason)
        .bind(account.flag_count() as i32)
        .bind(flag_reasons_json(account)?)
        .bind(account.deleted_at.map(|t| *t.as_datetime()))
        .bind(account.updated_at.as_datetime())
        .bind(account.version as i64)
        .execute(&self.pool)
        .await
        .map_err(db_error("update account"))?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)",
            )
            .bind(account.id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check account existence"))?;

            return Err(if exists {
                DomainError::concurrent_modification("Account", account.id)
            } else {
                DomainError::new(
                    ErrorCode::AccountNotFound,
                    format!("Account not found: {}", account.id),
                )
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM accounts WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch account"))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn list_flagged(&self) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE flag_count >= $1 AND deleted_at IS NULL \
             ORDER BY updated_at DESC",
            COLUMNS
        ))
        .bind(FLAG_THRESHOLD as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list flagged accounts"))?;
        rows.iter().map(row_to_account).collect()
    }

    async fn list_pending_experts(&self) -> Result<Vec<Account>, DomainError> {
        self.fetch_where(
            "role = 'expert' AND expert_status = 'pending' AND deleted_at IS NULL \
             ORDER BY created_at ASC",
            "list pending experts",
        )
        .await
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounts WHERE role = $1 AND deleted_at IS NULL",
        )
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count accounts"))?;

        Ok(count as u64)
    }
}

#[async_trait]
impl ExpertDirectory for PostgresAccountRepository {
    async fn find_newest_expert(
        &self,
        criteria: &ExpertCriteria,
    ) -> Result<Option<AccountId>, DomainError> {
        let id: Option<uuid::Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM accounts
            WHERE role = 'expert'
              AND expert_status = 'approved'
              AND deleted_at IS NULL
              AND ($1::TEXT IS NULL OR expert_category = $1)
              AND (NOT $2 OR is_online)
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(criteria.category.map(|c| c.as_str()))
        .bind(criteria.online_only)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find expert"))?;

        Ok(id.map(AccountId::from_uuid))
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let get_err = db_error("decode account row");

    let role: String = row.try_get("role").map_err(&get_err)?;
    let role: Role = role.parse().map_err(|e| corrupt_row("role", e))?;

    let profile = match role {
        Role::Asker => RoleProfile::Asker,
        Role::Admin => RoleProfile::Admin,
        Role::Expert => {
            let category: Option<String> = row.try_get("expert_category").map_err(&get_err)?;
            let status: Option<String> = row.try_get("expert_status").map_err(&get_err)?;
            let category: Category = category
                .ok_or_else(|| corrupt_row("expert_category", "missing for expert"))?
                .parse()
                .map_err(|e| corrupt_row("expert_category", e))?;
            let status: ExpertStatus = status
                .ok_or_else(|| corrupt_row("expert_status", "missing for expert"))?
                .parse()
                .map_err(|e| corrupt_row("expert_status", e))?;
            RoleProfile::Expert(ExpertProfile {
                category,
                status,
                is_online: row.try_get("is_online").map_err(&get_err)?,
                rejection_reason: row.try_get("rejection_reason").map_err(&get_err)?,
            })
        }
    };

    let flag_reasons: serde_json::Value = row.try_get("flag_reasons").map_err(&get_err)?;
    let flag_reasons: Vec<FlagRecord> =
        serde_json::from_value(flag_reasons).map_err(|e| corrupt_row("flag_reasons", e))?;

    let id: uuid::Uuid = row.try_get("id").map_err(&get_err)?;
    let flag_count: i32 = row.try_get("flag_count").map_err(&get_err)?;
    let deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("deleted_at").map_err(&get_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(&get_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(&get_err)?;
    let version: i64 = row.try_get("version").map_err(&get_err)?;

    Ok(Account::restore(
        AccountId::from_uuid(id),
        row.try_get("display_name").map_err(&get_err)?,
        profile,
        flag_count.max(0) as u32,
        flag_reasons,
        deleted_at.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        version.max(0) as u64,
    ))
}
