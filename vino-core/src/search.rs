use serde::Deserialize;

use crate::{CoreError, CoreResult};

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Catalog lookup parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductQuery {
    /// Matched against name, winery and varietal, case-insensitively.
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            q: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    pub fn validate(&self) -> CoreResult<()> {
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(CoreError::ValidationError(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        Ok(())
    }

    /// Search term with surrounding whitespace removed; blank terms count as absent.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
