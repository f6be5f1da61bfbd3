use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: u32 = 2;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip
    #[serde(default)]
    pub offset: u32,
}

pub(crate) fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub limit: u32,
    pub offset: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(limit: u32, offset: u32, total_items: i64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total_items.max(0) as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            limit,
            offset,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, pagination: PaginationParams, total_items: i64) -> Self {
        Self {
            items,
            pagination: PaginationMeta::new(pagination.limit, pagination.offset, total_items),
        }
    }
}
