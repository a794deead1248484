use serde::Serialize;
use url::form_urlencoded;
use utoipa::ToSchema;

use crate::database::{PageWindow, Paged};
use crate::dto::{
    experience_dto::ExperienceResponse, job_dto::JobResponse, review_dto::ReviewResponse,
    talent_dto::TalentResponse,
};
use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: i64 = 300;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Decoded query string that keeps repeated keys, so `skills=a&skills=b`
/// and `skills[]=a&skills[]=b` both yield two values.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| {
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        let bracketed = format!("{}[]", key);
        self.pairs
            .iter()
            .filter(|(k, _)| k == key || *k == bracketed)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn parse_i64(&self, key: &str) -> Result<Option<i64>> {
        self.first(key)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| Error::BadRequest(format!("Invalid value for {}.", key)))
            })
            .transpose()
    }

    pub fn page(&self) -> Result<PageRequest> {
        let page = match self.first("page") {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(invalid_page)?,
        };
        let page_size = self
            .first("page_size")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|size| *size >= 1)
            .map(|size| size.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(PageRequest { page, page_size })
    }
}

fn invalid_page() -> Error {
    Error::NotFound("Invalid page.".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.page_size,
            offset: self.page.saturating_sub(1).saturating_mul(self.page_size),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    TalentPage = Page<TalentResponse>,
    JobPage = Page<JobResponse>,
    ExperiencePage = Page<ExperienceResponse>,
    ReviewPage = Page<ReviewResponse>
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Builds the envelope, rejecting pages past the last one. An empty
    /// result still has a valid first page.
    pub fn new<M>(paged: Paged<M>, request: PageRequest) -> Result<Self>
    where
        M: Into<T>,
    {
        Self::from_items(
            paged.items.into_iter().map(Into::into).collect(),
            paged.total,
            request,
        )
    }

    pub fn from_items(items: Vec<T>, total: i64, request: PageRequest) -> Result<Self> {
        let total_pages = total_pages(total, request.page_size);
        if request.page > total_pages {
            return Err(invalid_page());
        }
        Ok(Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        })
    }
}

fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + page_size - 1) / page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let request = QueryParams::parse(None).page().unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.window(), PageWindow { limit: 300, offset: 0 });
    }

    #[test]
    fn clamps_page_size() {
        let request = QueryParams::parse(Some("page=2&page_size=5000"))
            .page()
            .unwrap();
        assert_eq!(request.page_size, MAX_PAGE_SIZE);
        assert_eq!(request.window().offset, MAX_PAGE_SIZE);
    }

    #[test]
    fn rejects_garbage_page() {
        let err = QueryParams::parse(Some("page=abc")).page().unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn collects_repeated_keys() {
        let params = QueryParams::parse(Some("skills=Rust&skills[]=Go&skills=&other=1"));
        assert_eq!(params.all("skills"), vec!["Rust", "Go"]);
    }

    #[test]
    fn counts_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn page_past_end_is_invalid() {
        let request = PageRequest { page: 3, page_size: 10 };
        assert!(Page::<i32>::from_items(vec![], 15, request).is_err());
        let first = PageRequest { page: 1, page_size: 10 };
        assert!(Page::<i32>::from_items(vec![], 0, first).is_ok());
    }
}
