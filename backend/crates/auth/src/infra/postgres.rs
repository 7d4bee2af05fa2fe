//! PostgreSQL Repository Implementation
//!
//! `tokens` is a `TEXT[]` column and `purchase_records` a JSONB array; both
//! are only ever changed with single-statement array operators.

use chrono::{DateTime, Utc};
use kernel::error::conversions::PG_UNIQUE_VIOLATION;
use kernel::id::UserId;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{purchase_record::PurchaseRecord, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult, UniqueField};

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        username,
        email,
        password_hash,
        tokens,
        purchase_records,
        created_at,
        updated_at
    FROM users
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let tokens: Vec<&str> = user.tokens.iter().map(SessionToken::as_str).collect();

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                password_hash,
                tokens,
                purchase_records,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(&tokens[..])
        .bind(Json(&user.purchase_records))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(user_name.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn append_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET tokens = array_append(tokens, $2), updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(token.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn remove_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET tokens = array_remove(tokens, $2), updated_at = now()
            WHERE user_id = $1 AND $2 = ANY(tokens)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(token.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_purchase(
        &self,
        user_id: &UserId,
        record: &PurchaseRecord,
    ) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET purchase_records = purchase_records || jsonb_build_array($2::jsonb),
                updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Json(record))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

/// Turn a unique violation into `DuplicateKey` naming the column
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    let field = match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) => {
            db_err.constraint().and_then(UniqueField::from_constraint)
        }
        _ => None,
    };

    match field {
        Some(field) => AuthError::DuplicateKey(field),
        None => AuthError::Database(err),
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    tokens: Vec<String>,
    purchase_records: Json<Vec<PurchaseRecord>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            tokens: self.tokens.into_iter().map(SessionToken::new).collect(),
            purchase_records: self.purchase_records.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
