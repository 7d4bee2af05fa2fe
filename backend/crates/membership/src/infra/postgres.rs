//! PostgreSQL Repository Implementation

use sqlx::PgPool;

use crate::domain::contact::Contact;
use crate::domain::repository::ContactRepository;
use crate::error::MembershipResult;

/// PostgreSQL-backed contact repository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: &Contact) -> MembershipResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (
                contact_id,
                name,
                email,
                age,
                contact,
                address,
                message,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(contact.contact_id.as_uuid())
        .bind(&contact.name)
        .bind(contact.email.as_str())
        .bind(contact.age)
        .bind(&contact.contact)
        .bind(&contact.address)
        .bind(&contact.message)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
