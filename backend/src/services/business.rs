//! Business directory service: listing, lookup and registration

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::Geocoder;
use crate::store::Store;
use shared::{
    validate_business_name, validate_coordinates, validate_phone, validate_website, Business,
    BusinessStatus, PaginatedResponse, Pagination, RegisterBusinessInput,
};

/// Query parameters for the public directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Case-insensitive match against name or category
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DirectoryQuery {
    pub fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
    }

    fn matches(&self, business: &Business) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| business.category == c);

        let query_ok = match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                business.name.to_lowercase().contains(&q)
                    || business.category.to_lowercase().contains(&q)
            }
            _ => true,
        };

        category_ok && query_ok
    }
}

/// Business directory service
#[derive(Clone)]
pub struct BusinessService {
    store: Store,
    geocoder: Arc<dyn Geocoder>,
}

impl BusinessService {
    pub fn new(store: Store, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Look up a business; unknown ids yield `None`
    pub async fn get_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        self.store.repo().get_business(id).await
    }

    /// Look up a business that must exist
    pub async fn require_business(&self, id: Uuid) -> AppResult<Business> {
        self.get_business(id)
            .await?
            .ok_or_else(|| AppError::not_found("Business"))
    }

    /// List a new, unverified business owned by `owner_id`
    pub async fn register_business(
        &self,
        owner_id: Uuid,
        input: RegisterBusinessInput,
    ) -> AppResult<Business> {
        let name = input.name.trim().to_string();
        validate_business_name(&name).map_err(|m| AppError::validation("name", m))?;

        let category = input.category.trim().to_string();
        if category.is_empty() {
            return Err(AppError::validation("category", "Category is required"));
        }

        validate_phone(&input.phone).map_err(|m| AppError::validation("phone", m))?;

        let address = input.address.trim().to_string();
        if address.is_empty() {
            return Err(AppError::validation("address", "Address is required"));
        }

        let website = input
            .website
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        if let Some(url) = &website {
            validate_website(url).map_err(|m| AppError::validation("website", m))?;
        }

        let location = match input.location {
            Some(location) => {
                validate_coordinates(&location).map_err(|m| AppError::validation("location", m))?;
                Some(location)
            }
            None => self
                .geocoder
                .geocode(&address)
                .await
                .map(|result| result.location),
        };

        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            owner_id,
            name,
            category,
            phone: input.phone.trim().to_string(),
            website,
            address,
            location,
            logo: input.logo,
            description: input.description,
            documents: input.documents,
            credibility_score: 0,
            status: BusinessStatus::Unverified,
            verified_badge: false,
            created_at: now,
            updated_at: now,
        };

        self.store.repo().save_business(&business).await?;

        tracing::info!(
            "Registered business {} ({}) for owner {}",
            business.id,
            business.name,
            owner_id
        );

        Ok(business)
    }

    /// Businesses owned by a user, in registration order
    pub async fn list_owned(&self, owner_id: Uuid) -> AppResult<Vec<Business>> {
        let businesses = self.store.repo().list_businesses().await?;
        Ok(businesses
            .into_iter()
            .filter(|b| b.owner_id == owner_id)
            .collect())
    }

    /// Search verified businesses
    pub async fn list_verified(&self, query: &DirectoryQuery) -> AppResult<PaginatedResponse<Business>> {
        let matches: Vec<Business> = self
            .verified_businesses()
            .await?
            .into_iter()
            .filter(|b| query.matches(b))
            .collect();

        Ok(query.pagination().apply(matches))
    }

    /// Distinct categories of verified businesses, sorted
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories: BTreeSet<String> = self
            .verified_businesses()
            .await?
            .into_iter()
            .map(|b| b.category)
            .collect();

        Ok(categories.into_iter().collect())
    }

    /// Verified businesses ranked by credibility score
    pub async fn top_verified(&self, limit: usize) -> AppResult<Vec<Business>> {
        let mut businesses = self.verified_businesses().await?;
        // Stable sort keeps registration order among equal scores
        businesses.sort_by(|a, b| b.credibility_score.cmp(&a.credibility_score));
        businesses.truncate(limit);
        Ok(businesses)
    }

    async fn verified_businesses(&self) -> AppResult<Vec<Business>> {
        let businesses = self.store.repo().list_businesses().await?;
        Ok(businesses.into_iter().filter(Business::is_verified).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{DisabledGeocoder, GeocodeResult};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::GpsCoordinates;

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Option<GeocodeResult> {
            Some(GeocodeResult {
                location: GpsCoordinates::new(Decimal::new(13_7563, 4), Decimal::new(100_5018, 4)),
                display_name: "Bangkok".to_string(),
            })
        }
    }

    fn input(name: &str) -> RegisterBusinessInput {
        RegisterBusinessInput {
            name: name.to_string(),
            category: "Retail".to_string(),
            phone: "+1 415 555 0100".to_string(),
            website: None,
            address: "1 Market St".to_string(),
            location: None,
            logo: None,
            description: None,
            documents: vec![],
        }
    }

    #[tokio::test]
    async fn test_register_starts_unverified() {
        let service = BusinessService::new(Store::in_memory(), Arc::new(DisabledGeocoder));
        let owner = Uuid::new_v4();

        let business = service.register_business(owner, input("Corner Shop")).await.unwrap();

        assert_eq!(business.status, BusinessStatus::Unverified);
        assert_eq!(business.credibility_score, 0);
        assert!(!business.verified_badge);
        assert_eq!(business.location, None);
        assert_eq!(service.list_owned(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_fills_location_from_geocoder() {
        let service = BusinessService::new(Store::in_memory(), Arc::new(FixedGeocoder));
        let business = service.register_business(Uuid::new_v4(), input("Corner Shop")).await.unwrap();
        assert_eq!(
            business.location.map(|l| l.latitude),
            Some(Decimal::new(13_7563, 4))
        );
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let service = BusinessService::new(Store::in_memory(), Arc::new(DisabledGeocoder));
        let err = service.register_business(Uuid::new_v4(), input("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
    }

    #[tokio::test]
    async fn test_unverified_businesses_hidden_from_directory() {
        let service = BusinessService::new(Store::in_memory(), Arc::new(DisabledGeocoder));
        service.register_business(Uuid::new_v4(), input("Corner Shop")).await.unwrap();

        let page = service.list_verified(&DirectoryQuery::default()).await.unwrap();
        assert!(page.data.is_empty());
        assert!(service.categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_business_is_absent() {
        let service = BusinessService::new(Store::in_memory(), Arc::new(DisabledGeocoder));
        assert!(service.get_business(Uuid::new_v4()).await.unwrap().is_none());
        assert!(matches!(
            service.require_business(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
