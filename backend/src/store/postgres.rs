//! PostgreSQL repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Repository, StoredUser, WorkflowChange};
use crate::error::{AppError, AppResult};
use shared::{
    validate_progress, Business, FraudReport, GpsCoordinates, ParseEnumError, Review, User,
    Verification, VerificationEvent,
};

/// Repository backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgRepository {
    db: PgPool,
}

impl PgRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))
    }
}

/// Parse a TEXT column holding a string-backed enum
fn parse_column<T>(value: &str) -> AppResult<T>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|e: ParseEnumError| AppError::Internal(format!("Corrupt row: {}", e)))
}

const BUSINESS_COLUMNS: &str = r#"
    id, owner_id, name, category, phone, website, address, latitude, longitude,
    logo, description, documents, credibility_score, status, verified_badge,
    created_at, updated_at
"#;

/// Database row for a business
#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    category: String,
    phone: String,
    website: Option<String>,
    address: String,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    logo: Option<String>,
    description: Option<String>,
    documents: Vec<String>,
    credibility_score: i32,
    status: String,
    verified_badge: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BusinessRow> for Business {
    type Error = AppError;

    fn try_from(row: BusinessRow) -> AppResult<Self> {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(GpsCoordinates::new(lat, lon)),
            _ => None,
        };

        Ok(Business {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            category: row.category,
            phone: row.phone,
            website: row.website,
            address: row.address,
            location,
            logo: row.logo,
            description: row.description,
            documents: row.documents,
            credibility_score: row.credibility_score,
            status: parse_column(&row.status)?,
            verified_badge: row.verified_badge,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const VERIFICATION_COLUMNS: &str = r#"
    id, business_id, verifier_id, verification_type, stage, progress,
    estimated_days_remaining, permit_verified, id_verified, address_confirmed,
    social_presence_checked, field_visit_done, notes, created_at, updated_at
"#;

/// Database row for the current verification of a business
#[derive(Debug, sqlx::FromRow)]
struct VerificationRow {
    id: Uuid,
    business_id: Uuid,
    verifier_id: Option<Uuid>,
    verification_type: String,
    stage: String,
    progress: i32,
    estimated_days_remaining: i32,
    permit_verified: bool,
    id_verified: bool,
    address_confirmed: bool,
    social_presence_checked: bool,
    field_visit_done: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VerificationRow> for Verification {
    type Error = AppError;

    fn try_from(row: VerificationRow) -> AppResult<Self> {
        validate_progress(row.progress)
            .map_err(|m| AppError::Internal(format!("Corrupt verification {}: {}", row.id, m)))?;

        Ok(Verification {
            id: row.id,
            business_id: row.business_id,
            verifier_id: row.verifier_id,
            verification_type: parse_column(&row.verification_type)?,
            stage: parse_column(&row.stage)?,
            progress: row.progress,
            estimated_days_remaining: row.estimated_days_remaining,
            permit_verified: row.permit_verified,
            id_verified: row.id_verified,
            address_confirmed: row.address_confirmed,
            social_presence_checked: row.social_presence_checked,
            field_visit_done: row.field_visit_done,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VerificationEventRow {
    id: Uuid,
    business_id: Uuid,
    verification_id: Option<Uuid>,
    kind: String,
    stage: Option<String>,
    progress: Option<i32>,
    actor_id: Option<Uuid>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<VerificationEventRow> for VerificationEvent {
    type Error = AppError;

    fn try_from(row: VerificationEventRow) -> AppResult<Self> {
        Ok(VerificationEvent {
            id: row.id,
            business_id: row.business_id,
            verification_id: row.verification_id,
            kind: parse_column(&row.kind)?,
            stage: row.stage.as_deref().map(parse_column).transpose()?,
            progress: row.progress,
            actor_id: row.actor_id,
            note: row.note,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    avatar: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for StoredUser {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        Ok(StoredUser {
            user: User {
                id: row.id,
                email: row.email,
                name: row.name,
                role: parse_column(&row.role)?,
                avatar: row.avatar,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FraudReportRow {
    id: Uuid,
    business_id: Uuid,
    reporter_id: Uuid,
    reason: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FraudReportRow> for FraudReport {
    type Error = AppError;

    fn try_from(row: FraudReportRow) -> AppResult<Self> {
        Ok(FraudReport {
            id: row.id,
            business_id: row.business_id,
            reporter_id: row.reporter_id,
            reason: parse_column(&row.reason)?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

async fn upsert_business<'e, E>(executor: E, business: &Business) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO businesses (
            id, owner_id, name, category, phone, website, address, latitude, longitude,
            logo, description, documents, credibility_score, status, verified_badge,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            category = EXCLUDED.category,
            phone = EXCLUDED.phone,
            website = EXCLUDED.website,
            address = EXCLUDED.address,
            latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            logo = EXCLUDED.logo,
            description = EXCLUDED.description,
            documents = EXCLUDED.documents,
            credibility_score = EXCLUDED.credibility_score,
            status = EXCLUDED.status,
            verified_badge = EXCLUDED.verified_badge,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(business.id)
    .bind(business.owner_id)
    .bind(&business.name)
    .bind(&business.category)
    .bind(&business.phone)
    .bind(&business.website)
    .bind(&business.address)
    .bind(business.location.map(|l| l.latitude))
    .bind(business.location.map(|l| l.longitude))
    .bind(&business.logo)
    .bind(&business.description)
    .bind(&business.documents)
    .bind(business.credibility_score)
    .bind(business.status.as_str())
    .bind(business.verified_badge)
    .bind(business.created_at)
    .bind(business.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl Repository for PgRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn get_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        let row = sqlx::query_as::<_, BusinessRow>(&format!(
            "SELECT {} FROM businesses WHERE id = $1",
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Business::try_from).transpose()
    }

    async fn list_businesses(&self) -> AppResult<Vec<Business>> {
        let rows = sqlx::query_as::<_, BusinessRow>(&format!(
            "SELECT {} FROM businesses ORDER BY seq",
            BUSINESS_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Business::try_from).collect()
    }

    async fn save_business(&self, business: &Business) -> AppResult<()> {
        upsert_business(&self.db, business).await
    }

    async fn get_verification(&self, business_id: Uuid) -> AppResult<Option<Verification>> {
        let row = sqlx::query_as::<_, VerificationRow>(&format!(
            "SELECT {} FROM verifications WHERE business_id = $1",
            VERIFICATION_COLUMNS
        ))
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Verification::try_from).transpose()
    }

    async fn list_verifications(&self) -> AppResult<Vec<Verification>> {
        let rows = sqlx::query_as::<_, VerificationRow>(&format!(
            "SELECT {} FROM verifications ORDER BY updated_at DESC",
            VERIFICATION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Verification::try_from).collect()
    }

    async fn list_verification_events(&self, business_id: Uuid) -> AppResult<Vec<VerificationEvent>> {
        let rows = sqlx::query_as::<_, VerificationEventRow>(
            r#"
            SELECT id, business_id, verification_id, kind, stage, progress, actor_id, note, created_at
            FROM verification_events
            WHERE business_id = $1
            ORDER BY seq
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(VerificationEvent::try_from).collect()
    }

    async fn commit_workflow(&self, change: WorkflowChange<'_>) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        if let Some(business) = change.business {
            upsert_business(&mut *tx, business).await?;
        }

        if let Some(v) = change.verification {
            sqlx::query(
                r#"
                INSERT INTO verifications (
                    business_id, id, verifier_id, verification_type, stage, progress,
                    estimated_days_remaining, permit_verified, id_verified, address_confirmed,
                    social_presence_checked, field_visit_done, notes, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT (business_id) DO UPDATE SET
                    id = EXCLUDED.id,
                    verifier_id = EXCLUDED.verifier_id,
                    verification_type = EXCLUDED.verification_type,
                    stage = EXCLUDED.stage,
                    progress = EXCLUDED.progress,
                    estimated_days_remaining = EXCLUDED.estimated_days_remaining,
                    permit_verified = EXCLUDED.permit_verified,
                    id_verified = EXCLUDED.id_verified,
                    address_confirmed = EXCLUDED.address_confirmed,
                    social_presence_checked = EXCLUDED.social_presence_checked,
                    field_visit_done = EXCLUDED.field_visit_done,
                    notes = EXCLUDED.notes,
                    created_at = EXCLUDED.created_at,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(v.business_id)
            .bind(v.id)
            .bind(v.verifier_id)
            .bind(v.verification_type.as_str())
            .bind(v.stage.as_str())
            .bind(v.progress)
            .bind(v.estimated_days_remaining)
            .bind(v.permit_verified)
            .bind(v.id_verified)
            .bind(v.address_confirmed)
            .bind(v.social_presence_checked)
            .bind(v.field_visit_done)
            .bind(&v.notes)
            .bind(v.created_at)
            .bind(v.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        let event = change.event;
        sqlx::query(
            r#"
            INSERT INTO verification_events (
                id, business_id, verification_id, kind, stage, progress, actor_id, note, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(event.business_id)
        .bind(event.verification_id)
        .bind(event.kind.as_str())
        .bind(event.stage.map(|s| s.as_str()))
        .bind(event.progress)
        .bind(event.actor_id)
        .bind(&event.note)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_reviews(&self, business_id: Uuid) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, i32, String, DateTime<Utc>)>(
            r#"
            SELECT id, business_id, user_id, user_name, rating, comment, created_at
            FROM reviews
            WHERE business_id = $1
            ORDER BY seq
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, business_id, user_id, user_name, rating, comment, created_at)| Review {
                    id,
                    business_id,
                    user_id,
                    user_name,
                    rating,
                    comment,
                    created_at,
                },
            )
            .collect())
    }

    async fn insert_review(&self, review: &Review) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, business_id, user_id, user_name, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.id)
        .bind(review.business_id)
        .bind(review.user_id)
        .bind(&review.user_name)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, avatar, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row
            .map(StoredUser::try_from)
            .transpose()?
            .map(|stored| stored.user))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, avatar, password_hash, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        row.map(StoredUser::try_from).transpose()
    }

    async fn insert_user(&self, stored: &StoredUser) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, role, avatar, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(stored.user.id)
        .bind(&stored.user.email)
        .bind(&stored.user.name)
        .bind(stored.user.role.as_str())
        .bind(&stored.user.avatar)
        .bind(&stored.password_hash)
        .bind(stored.user.created_at)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "An account with this email already exists".to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_fraud_report(&self, report: &FraudReport) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fraud_reports (id, business_id, reporter_id, reason, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(report.id)
        .bind(report.business_id)
        .bind(report.reporter_id)
        .bind(report.reason.as_str())
        .bind(&report.notes)
        .bind(report.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn list_fraud_reports(&self, business_id: Option<Uuid>) -> AppResult<Vec<FraudReport>> {
        let rows = sqlx::query_as::<_, FraudReportRow>(
            r#"
            SELECT id, business_id, reporter_id, reason, notes, created_at
            FROM fraud_reports
            WHERE $1::uuid IS NULL OR business_id = $1
            ORDER BY seq
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(FraudReport::try_from).collect()
    }
}
