use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which records a history query keeps.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryFilter {
    /// Exact match on the entry kind.
    Kind(TransactionKind),
    /// Case-sensitive substring match on the sender's name. Only
    /// `Transfer In` entries carry one, so other kinds never match.
    SenderName(String),
    /// Case-sensitive substring match on the recipient's name. Only
    /// `Transfer Out` entries carry one.
    RecipientName(String),
}

impl HistoryFilter {
    fn keeps(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::Kind(kind) => record.kind == *kind,
            Self::SenderName(key) => {
                record.kind == TransactionKind::TransferIn
                    && record
                        .counterpart_name
                        .as_deref()
                        .is_some_and(|name| name.contains(key.as_str()))
            }
            Self::RecipientName(key) => {
                record.kind == TransactionKind::TransferOut
                    && record
                        .counterpart_name
                        .as_deref()
                        .is_some_and(|name| name.contains(key.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Timestamp,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort key and direction. The default, newest first, is what a statement
/// shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Timestamp,
            order: SortOrder::Desc,
        }
    }
}

/// 1-based page selection. `number` defaults to the first page, `size` to
/// however many records survived the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub number: Option<usize>,
    pub size: Option<usize>,
}

/// One projected entry: everything a statement line needs, nothing more.
/// The timestamp stays a raw instant; rendering is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub kind: TransactionKind,
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
}

/// The page envelope handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// How many records survived the filter, across all pages.
    pub count: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<HistoryEntry>,
}

/// Resolved slice bounds for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

/// Keeps the records the filter accepts, in their original order.
pub fn filter_records(
    records: Vec<TransactionRecord>,
    filter: Option<&HistoryFilter>,
) -> Vec<TransactionRecord> {
    match filter {
        None => records,
        Some(filter) => records
            .into_iter()
            .filter(|record| filter.keeps(record))
            .collect(),
    }
}

/// Sorts in place. Ties on the sort key fall back to the record id, which
/// makes the order total: descending is the exact reverse of ascending, and
/// repeated queries agree on the order.
pub fn sort_records(records: &mut [TransactionRecord], spec: SortSpec) {
    records.sort_by(|a, b| {
        let ordering = match spec.field {
            SortField::Timestamp => a
                .timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id)),
            SortField::Amount => a.amount.cmp(&b.amount).then_with(|| a.id.cmp(&b.id)),
        };
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Resolves the page window over `count` records.
///
/// `EmptyPage` whenever the requested page lies beyond the last one. Zero
/// records means zero pages, so every request against an empty history is
/// out of range, page 1 included. An explicit zero for number or size is a
/// `ValidationError`; omitted values take the defaults.
pub fn paginate(count: usize, request: PageRequest) -> Result<PageBounds> {
    let page_number = match request.number {
        None => 1,
        Some(0) => {
            return Err(LedgerError::ValidationError(
                "page number must be at least 1".to_string(),
            ));
        }
        Some(n) => n,
    };
    let page_size = match request.size {
        None => count,
        Some(0) => {
            return Err(LedgerError::ValidationError(
                "page size must be at least 1".to_string(),
            ));
        }
        Some(n) => n,
    };

    let total_pages = if count == 0 {
        0
    } else {
        count.div_ceil(page_size)
    };
    if page_number > total_pages {
        return Err(LedgerError::EmptyPage {
            page_number,
            total_pages,
        });
    }

    let start = (page_number - 1) * page_size;
    let end = (start + page_size).min(count);
    Ok(PageBounds {
        page_number,
        page_size,
        total_pages,
        start,
        end,
    })
}

/// Projects records into statement entries.
pub fn project(records: &[TransactionRecord]) -> Vec<HistoryEntry> {
    records
        .iter()
        .map(|record| HistoryEntry {
            id: record.id,
            kind: record.kind,
            amount: record.amount,
            timestamp: record.timestamp,
            counterpart_name: record.counterpart_name.clone(),
        })
        .collect()
}

/// The whole pipeline over a history snapshot: filter, sort, paginate,
/// project. Pure and stateless; concurrent balance changes do not affect a
/// query already holding its snapshot.
pub fn query_history(
    records: Vec<TransactionRecord>,
    filter: Option<&HistoryFilter>,
    sort: Option<SortSpec>,
    page: PageRequest,
) -> Result<HistoryPage> {
    let mut records = filter_records(records, filter);
    sort_records(&mut records, sort.unwrap_or_default());
    let bounds = paginate(records.len(), page)?;
    let data = project(&records[bounds.start..bounds.end]);
    Ok(HistoryPage {
        page_number: bounds.page_number,
        page_size: bounds.page_size,
        total_pages: bounds.total_pages,
        count: records.len(),
        has_previous_page: bounds.page_number > 1,
        has_next_page: bounds.page_number < bounds.total_pages,
        data,
    })
}
