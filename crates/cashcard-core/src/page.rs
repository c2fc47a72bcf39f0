//! Paging and sorting for card listings
//!
//! Query parameters follow the familiar `page`, `size` and `sort` triple:
//!
//! - `page`: zero-based page index
//! - `size`: rows per page, clamped to a configured maximum
//! - `sort`: `property[,property...][,asc|desc]`, repeatable
//!
//! Parsing comes in two flavors. The `parse_*` functions are strict and
//! return a [`CoreError`] on bad input; [`PageRequest::from_query`] is
//! lenient and falls back to [`PageDefaults`] for anything it cannot use.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::card::CashCard;
use crate::error::{CoreError, Result};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on rows per page
pub const MAX_PAGE_SIZE: usize = 2000;

/// Sortable card properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Amount,
    Owner,
}

impl SortField {
    /// Column name in the card table
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Amount => "amount",
            SortField::Owner => "owner",
        }
    }

    /// Ascending comparison of two cards on this property
    pub fn compare(&self, a: &CashCard, b: &CashCard) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Owner => a.owner.cmp(&b.owner),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "amount" => Ok(SortField::Amount),
            "owner" => Ok(SortField::Owner),
            other => Err(CoreError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

/// One `property, direction` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Compare two cards under this order
    pub fn compare(&self, a: &CashCard, b: &CashCard) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

/// Fallbacks applied when a listing request omits or garbles a parameter
#[derive(Debug, Clone, PartialEq)]
pub struct PageDefaults {
    pub size: usize,
    pub max_size: usize,
    pub sort: Vec<SortOrder>,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
            sort: vec![SortOrder::desc(SortField::Amount)],
        }
    }
}

/// A resolved page request: never empty, never unbounded
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        let defaults = PageDefaults::default();
        Self {
            page: 0,
            size: defaults.size,
            sort: defaults.sort,
        }
    }
}

impl PageRequest {
    /// Page `page` of `size` rows under the default sort
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
            ..Self::default()
        }
    }

    /// Replace the sort orders; an empty list keeps the current ones
    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        if !sort.is_empty() {
            self.sort = sort;
        }
        self
    }

    /// Number of rows to skip
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Total order over cards: the requested orders, then ascending id
    pub fn compare(&self, a: &CashCard, b: &CashCard) -> Ordering {
        self.sort
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }

    /// Sort `cards` and cut out this page
    pub fn apply(&self, mut cards: Vec<CashCard>) -> Vec<CashCard> {
        cards.sort_by(|a, b| self.compare(a, b));
        cards
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect()
    }

    /// Build a request from raw query pairs
    ///
    /// Unparsable `page`/`size` values and unknown sort properties are
    /// dropped in favor of `defaults`. `sort` may appear more than once.
    pub fn from_query<I, K, V>(params: I, defaults: &PageDefaults) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut page = 0;
        let mut size = defaults.size;
        let mut sort = Vec::new();

        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "page" => page = parse_page(value).unwrap_or(0),
                "size" => size = parse_size(value, defaults.max_size).unwrap_or(defaults.size),
                "sort" => {
                    let (properties, direction) = split_sort(value);
                    sort.extend(
                        properties
                            .into_iter()
                            .filter_map(|p| p.parse::<SortField>().ok())
                            .map(|field| SortOrder::new(field, direction)),
                    );
                }
                _ => {}
            }
        }

        if sort.is_empty() {
            sort = defaults.sort.clone();
        }

        Self {
            page,
            size: size.clamp(1, defaults.max_size.max(1)),
            sort,
        }
    }
}

/// Parse a zero-based page index
pub fn parse_page(value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| CoreError::InvalidPage(value.to_string()))
}

/// Parse a page size, clamping it to `max_size`
pub fn parse_size(value: &str, max_size: usize) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(CoreError::InvalidPageSize(value.to_string())),
        Ok(size) => Ok(size.min(max_size.max(1))),
    }
}

// A trailing asc/desc token applies to every property before it.
fn split_sort(value: &str) -> (Vec<&str>, Direction) {
    let mut tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let direction = match tokens.last().and_then(|t| Direction::parse(t)) {
        Some(direction) => {
            tokens.pop();
            direction
        }
        None => Direction::Asc,
    };

    (tokens, direction)
}
