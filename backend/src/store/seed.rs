//! Demo data loaded when `seed_demo_data` is enabled

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Store, StoredUser, WorkflowChange};
use crate::error::{AppError, AppResult};
use shared::{
    Business, BusinessStatus, GpsCoordinates, Review, User, UserRole, Verification,
    VerificationEvent, VerificationEventKind, VerificationStage, VerificationType,
};

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password123";

pub const DEMO_CUSTOMER_ID: Uuid = Uuid::from_u128(0x0001);
pub const DEMO_OWNER_ID: Uuid = Uuid::from_u128(0x0002);
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0x0003);

pub const SMITHS_ELECTRONICS_ID: Uuid = Uuid::from_u128(0x0b01);
pub const FRESH_MARKET_ID: Uuid = Uuid::from_u128(0x0b02);
pub const DIGITAL_SOLUTIONS_ID: Uuid = Uuid::from_u128(0x0b03);

struct DemoBusiness {
    id: Uuid,
    owner_id: Uuid,
    name: &'static str,
    category: &'static str,
    phone: &'static str,
    website: &'static str,
    address: &'static str,
    latitude: Decimal,
    longitude: Decimal,
    logo: &'static str,
    description: &'static str,
    score: i32,
    age_days: i64,
    verification_type: VerificationType,
    stage: VerificationStage,
    checklist: [bool; 5],
}

fn demo_businesses() -> Vec<DemoBusiness> {
    vec![
        DemoBusiness {
            id: SMITHS_ELECTRONICS_ID,
            owner_id: DEMO_OWNER_ID,
            name: "Smith's Electronics",
            category: "Electronics",
            phone: "+1-800-SMITH-01",
            website: "https://smithselectronics.com",
            address: "123 Main St, San Francisco, CA 94102",
            latitude: Decimal::new(377749, 4),
            longitude: Decimal::new(-1224194, 4),
            logo: "https://images.unsplash.com/photo-1505228395891-9a51e7e86e81?w=200",
            description: "Leading electronics retailer with 10+ years experience",
            score: 92,
            age_days: 180,
            verification_type: VerificationType::Field,
            stage: VerificationStage::FinalApproval,
            checklist: [true, true, true, true, true],
        },
        DemoBusiness {
            id: FRESH_MARKET_ID,
            owner_id: Uuid::from_u128(0x0004),
            name: "Fresh Market Goods",
            category: "Retail",
            phone: "+1-800-FRESH-01",
            website: "https://freshmarketgoods.com",
            address: "456 Oak Ave, New York, NY 10001",
            latitude: Decimal::new(407128, 4),
            longitude: Decimal::new(-74006, 3),
            logo: "https://images.unsplash.com/photo-1548365328-c9403f08397b?w=200",
            description: "Quality products at affordable prices",
            score: 85,
            age_days: 90,
            verification_type: VerificationType::Field,
            stage: VerificationStage::FieldVerification,
            checklist: [true, true, true, true, false],
        },
        DemoBusiness {
            id: DIGITAL_SOLUTIONS_ID,
            owner_id: Uuid::from_u128(0x0005),
            name: "Digital Solutions Ltd",
            category: "Services",
            phone: "+1-800-DIGITAL-01",
            website: "https://digitalsolutions.com",
            address: "789 Tech Blvd, Austin, TX 78701",
            latitude: Decimal::new(302672, 4),
            longitude: Decimal::new(-977431, 4),
            logo: "https://images.unsplash.com/photo-1522542550221-31bfe97f0100?w=200",
            description: "Professional IT and consulting services",
            score: 78,
            age_days: 60,
            verification_type: VerificationType::Document,
            stage: VerificationStage::DocumentsReview,
            checklist: [true, false, false, false, false],
        },
    ]
}

// (business, user id, user name, rating, comment, age in days)
const DEMO_REVIEWS: &[(Uuid, u128, &str, i32, &str, i64)] = &[
    (SMITHS_ELECTRONICS_ID, 0x0001, "Sarah Chen", 5, "Excellent service and quality products. Highly recommended!", 10),
    (SMITHS_ELECTRONICS_ID, 0x0014, "Mike Johnson", 4, "Good experience. Fast delivery and responsive support.", 20),
    (SMITHS_ELECTRONICS_ID, 0x0015, "Emma Davis", 5, "Professional team. Very satisfied with the purchase.", 30),
    (FRESH_MARKET_ID, 0x0001, "Sarah Chen", 4, "Good prices and fresh products. Will buy again.", 15),
    (FRESH_MARKET_ID, 0x0016, "Lisa Wang", 4, "Reliable seller. Always on time.", 25),
    (DIGITAL_SOLUTIONS_ID, 0x0017, "Alex Rodriguez", 5, "Outstanding technical support. Problem solved in minutes.", 12),
];

/// Load demo accounts, businesses, verifications and reviews.
///
/// Does nothing when the demo customer account already exists, so restarting
/// against a persistent database does not duplicate rows.
pub async fn seed_demo_data(store: &Store, bcrypt_cost: u32) -> AppResult<()> {
    let repo = store.repo();

    if repo.find_user_by_email("customer@test.com").await?.is_some() {
        tracing::debug!("Demo data already present, skipping seed");
        return Ok(());
    }

    let now = Utc::now();
    let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    let accounts = [
        (DEMO_CUSTOMER_ID, "customer@test.com", "Sarah Chen", UserRole::Customer,
         Some("https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=400")),
        (DEMO_OWNER_ID, "business@test.com", "John Smith", UserRole::Business,
         Some("https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400")),
        (DEMO_ADMIN_ID, "admin@test.com", "Admin User", UserRole::Admin, None),
    ];

    for (id, email, name, role, avatar) in accounts {
        repo.insert_user(&StoredUser {
            user: User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                role,
                avatar: avatar.map(str::to_string),
                created_at: now,
            },
            password_hash: password_hash.clone(),
        })
        .await?;
    }

    for demo in demo_businesses() {
        let created_at = now - Duration::days(demo.age_days);
        let business = Business {
            id: demo.id,
            owner_id: demo.owner_id,
            name: demo.name.to_string(),
            category: demo.category.to_string(),
            phone: demo.phone.to_string(),
            website: Some(demo.website.to_string()),
            address: demo.address.to_string(),
            location: Some(GpsCoordinates::new(demo.latitude, demo.longitude)),
            logo: Some(demo.logo.to_string()),
            description: Some(demo.description.to_string()),
            documents: vec!["permit.pdf".to_string(), "id.pdf".to_string()],
            credibility_score: demo.score,
            status: BusinessStatus::Verified,
            verified_badge: true,
            created_at,
            updated_at: now,
        };

        let [permit, id, address, social, field_visit] = demo.checklist;
        let verification = Verification {
            id: Uuid::new_v4(),
            business_id: demo.id,
            verifier_id: Some(DEMO_ADMIN_ID),
            verification_type: demo.verification_type,
            stage: demo.stage,
            progress: demo.stage.progress(),
            estimated_days_remaining: demo.stage.estimated_days_remaining(),
            permit_verified: permit,
            id_verified: id,
            address_confirmed: address,
            social_presence_checked: social,
            field_visit_done: field_visit,
            notes: None,
            created_at,
            updated_at: now,
        };

        let event = VerificationEvent::record(
            VerificationEventKind::Submitted,
            demo.id,
            Some(&verification),
            Some(DEMO_ADMIN_ID),
            Some("Imported demo record".to_string()),
            now,
        );

        repo.commit_workflow(WorkflowChange {
            business: Some(&business),
            verification: Some(&verification),
            event: &event,
        })
        .await?;
    }

    for (business_id, user_id, user_name, rating, comment, age_days) in DEMO_REVIEWS {
        repo.insert_review(&Review {
            id: Uuid::new_v4(),
            business_id: *business_id,
            user_id: Uuid::from_u128(*user_id),
            user_name: user_name.to_string(),
            rating: *rating,
            comment: comment.to_string(),
            created_at: now - Duration::days(*age_days),
        })
        .await?;
    }

    tracing::info!("Seeded demo data into {} repository", repo.backend_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();
        seed_demo_data(&store, 4).await.unwrap();

        let repo = store.repo();
        assert_eq!(repo.list_businesses().await.unwrap().len(), 3);
        assert_eq!(repo.list_reviews(SMITHS_ELECTRONICS_ID).await.unwrap().len(), 3);
        assert_eq!(
            repo.list_verification_events(FRESH_MARKET_ID).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_seeded_verifications_match_stage() {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();

        let v = store
            .repo()
            .get_verification(DIGITAL_SOLUTIONS_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(v.stage, VerificationStage::DocumentsReview);
        assert_eq!(v.progress, 25);
        assert!(v.permit_verified);
        assert!(!v.id_verified);
    }
}
