//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from floating point degrees, as returned by geocoders
    pub fn from_degrees(latitude: f64, longitude: f64) -> Option<Self> {
        Some(Self {
            latitude: Decimal::from_f64_retain(latitude)?,
            longitude: Decimal::from_f64_retain(longitude)?,
        })
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Slice an already-filtered list into the requested page
    pub fn apply<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, 100);
        let total_items = items.len() as u64;
        let total_pages = total_items.div_ceil(per_page as u64) as u32;

        let offset = u64::from(page - 1) * u64::from(per_page);
        let data = items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(per_page as usize)
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                total_items,
                total_pages,
            },
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}
