use serde::Deserialize;

use super::deserializers::lenient_page;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    page: Option<i64>,
}

impl PageQuery {
    /// 1-based page number, defaulting to the first page.
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// Window `[(page - 1) * 10, page * 10)` of `items`. Pages outside the data,
/// including anything below 1, come back empty.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let Some(index) = usize::try_from(page).ok().and_then(|p| p.checked_sub(1)) else {
        return &[];
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
