//! Paging protocol shared with the backend.
//!
//! Pages are 1-based and sized by the caller through the `limit` query
//! parameter. Every paged response carries a [`Pagination`] envelope.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// First page number understood by the backend.
pub const FIRST_PAGE: u32 = 1;

/// Rows per request for the energy-records table.
pub const ENERGY_PAGE_SIZE: usize = 20;

/// Rows per request for the reports table.
pub const REPORTS_PAGE_SIZE: usize = 10;

/// Pagination envelope returned alongside every paged payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// 1-based page owning the 0-based slot `index`.
pub fn page_for_index(index: usize, page_size: usize) -> u32 {
    (index / page_size.max(1)) as u32 + FIRST_PAGE
}

/// 0-based slot offset of the first record on `page`.
pub fn page_base_offset(page: u32, page_size: usize) -> CoreResult<usize> {
    if page < FIRST_PAGE {
        return Err(CoreError::InvalidPage { page });
    }
    Ok((page - FIRST_PAGE) as usize * page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_for_index_is_one_based() {
        assert_eq!(page_for_index(0, 20), 1);
        assert_eq!(page_for_index(19, 20), 1);
        assert_eq!(page_for_index(20, 20), 2);
        assert_eq!(page_for_index(90, 20), 5);
    }

    #[test]
    fn base_offset_rejects_page_zero() {
        assert!(page_base_offset(0, 20).is_err());
        assert_eq!(page_base_offset(3, 20).unwrap(), 40);
    }

    #[test]
    fn has_next_tracks_last_page() {
        let p = Pagination {
            total: 91,
            page: 4,
            pages: 5,
        };
        assert!(p.has_next());
        assert!(!Pagination { page: 5, ..p }.has_next());
    }
}
