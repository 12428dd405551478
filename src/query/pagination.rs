//! Pagination arithmetic

use super::criteria::PageRequest;

/// Offset/limit window for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    /// Window `[(page-1)*page_size, (page-1)*page_size + page_size)`
    pub fn for_request(request: &PageRequest) -> Self {
        let limit = request.page_size() as usize;
        let offset = (request.page().saturating_sub(1) as usize).saturating_mul(limit);
        Self { offset, limit }
    }

    /// Applies the window; an offset past the end yields an empty page.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

/// `ceil(total / page_size)`, or 0 when nothing matched
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if total == 0 || page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}
