use std::cmp::Ordering;

use crate::model::PromotionRecord;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Lower `order_seq` first; newer `create_date` first within the same priority.
pub fn compare_records(a: &PromotionRecord, b: &PromotionRecord) -> Ordering {
    a.order_seq
        .cmp(&b.order_seq)
        .then_with(|| b.create_date.cmp(&a.create_date))
}

pub fn sort_records(mut records: Vec<PromotionRecord>) -> Vec<PromotionRecord> {
    // stable: full ties keep their input order
    records.sort_by(compare_records);
    records
}

/// Returns page `page` (1-based) of `records`. Pages past the end, and page 0,
/// are empty.
pub fn page(records: &[PromotionRecord], page: usize, page_size: usize) -> &[PromotionRecord] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

#[derive(Clone, Debug)]
pub struct Paginator {
    records: Vec<PromotionRecord>,
    page_size: usize,
}

impl Paginator {
    pub fn new(records: Vec<PromotionRecord>, page_size: usize) -> Self {
        Self {
            records: sort_records(records),
            page_size,
        }
    }

    pub fn empty(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            page_size,
        }
    }

    pub fn page(&self, number: usize) -> &[PromotionRecord] {
        page(&self.records, number, self.page_size)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.records.len().div_ceil(self.page_size)
    }

    pub fn records(&self) -> &[PromotionRecord] {
        &self.records
    }
}
