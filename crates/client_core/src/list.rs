//! Pagination and filter state for one entity, emitting a fetch ticket on
//! every effective parameter change.

use crate::{entity::FilterSet, error::ClientError};

pub const PAGE_SIZE_OPTIONS: &[u32] = &[5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams<F> {
    pub page: u32,
    pub page_size: u32,
    pub filters: F,
}

impl<F> ListParams<F> {
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// A request token: the parameters a fetch was issued for plus its issue
/// order. Responses carry it back so stale ones can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<F> {
    pub seq: u64,
    pub params: ListParams<F>,
}

pub fn last_page(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub last_page: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl Pager {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let last_page = last_page(total, page_size);
        Self {
            page,
            page_size,
            total,
            last_page,
            prev_disabled: page <= 1,
            next_disabled: page >= last_page,
        }
    }
}

#[derive(Debug)]
pub struct ListController<F: FilterSet> {
    page: u32,
    page_size: u32,
    filters: F,
    next_seq: u64,
}

impl<F: FilterSet> ListController<F> {
    pub fn new(page_size: u32) -> Result<Self, ClientError> {
        check_page_size(page_size)?;
        Ok(Self {
            page: 1,
            page_size,
            filters: F::default(),
            next_seq: 0,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn params(&self) -> ListParams<F> {
        ListParams {
            page: self.page,
            page_size: self.page_size,
            filters: self.filters.clone(),
        }
    }

    pub fn pager(&self, total: u64) -> Pager {
        Pager::new(self.page, self.page_size, total)
    }

    /// Upper bound is the caller's concern; zero is raised to the first page.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket<F>> {
        let page = page.max(1);
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.issue())
    }

    pub fn set_filter(&mut self, update: F::Update) -> Option<FetchTicket<F>> {
        let filters_changed = self.filters.apply(update);
        let page_changed = self.page != 1;
        self.page = 1;
        (filters_changed || page_changed).then(|| self.issue())
    }

    pub fn set_filter_str(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<Option<FetchTicket<F>>, ClientError> {
        let update = F::parse_update(key, value)?;
        Ok(self.set_filter(update))
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<Option<FetchTicket<F>>, ClientError> {
        check_page_size(page_size)?;
        if page_size == self.page_size && self.page == 1 {
            return Ok(None);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(Some(self.issue()))
    }

    /// Applies a page size, string-keyed filters and a target page together,
    /// issuing at most one ticket. A rejected size or filter changes nothing.
    pub fn set_view(
        &mut self,
        page_size: Option<u32>,
        filters: &[(&str, &str)],
        page: u32,
    ) -> Result<Option<FetchTicket<F>>, ClientError> {
        if let Some(page_size) = page_size {
            check_page_size(page_size)?;
        }
        let updates = filters
            .iter()
            .map(|(key, value)| F::parse_update(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        let mut next = self.params();
        for update in updates {
            next.filters.apply(update);
        }
        next.page_size = page_size.unwrap_or(next.page_size);
        next.page = page.max(1);
        if next == self.params() {
            return Ok(None);
        }
        self.page = next.page;
        self.page_size = next.page_size;
        self.filters = next.filters;
        Ok(Some(self.issue()))
    }

    /// Re-issues the current parameters, e.g. after a successful submit.
    pub fn refresh(&mut self) -> FetchTicket<F> {
        self.issue()
    }

    pub fn is_current(&self, ticket: &FetchTicket<F>) -> bool {
        ticket.params.page == self.page
            && ticket.params.page_size == self.page_size
            && ticket.params.filters == self.filters
    }

    fn issue(&mut self) -> FetchTicket<F> {
        self.next_seq += 1;
        FetchTicket {
            seq: self.next_seq,
            params: self.params(),
        }
    }
}

fn check_page_size(page_size: u32) -> Result<(), ClientError> {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        Ok(())
    } else {
        Err(ClientError::UnsupportedPageSize(page_size))
    }
}
