use bson::{Bson, Document, Regex, doc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppError, models::ScholarshipCategory};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// ScholarshipSearchParams
///
/// Raw query string of `GET /scholarships`. Every value arrives as text so that a
/// bad `page` or `limit` falls back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScholarshipSearchParams {
    /// Case-insensitive substring matched against name, university and degree.
    pub search: Option<String>,
    /// Exact country match.
    pub country: Option<String>,
    /// Exact category match. Unknown categories are rejected.
    pub category: Option<String>,
    /// `applicationFees` or `postDate`. Anything else means unsorted.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// SortKey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ApplicationFees,
    PostDate,
}

impl SortKey {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "applicationFees" => Some(Self::ApplicationFees),
            "postDate" => Some(Self::PostDate),
            _ => None,
        }
    }

    /// Stored field the key sorts on.
    pub fn field(self) -> &'static str {
        match self {
            Self::ApplicationFees => "applicationFees",
            Self::PostDate => "scholarshipPostDate",
        }
    }
}

/// SortOrder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn direction(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// ScholarshipQuery
///
/// Validated form of `ScholarshipSearchParams`. It is the only place that knows
/// how a catalogue search maps onto a store filter, sort and window, so the
/// repository never sees user text directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScholarshipQuery {
    search: Option<String>,
    country: Option<String>,
    category: Option<ScholarshipCategory>,
    sort: Option<(SortKey, SortOrder)>,
    page: u64,
    limit: u64,
}

impl Default for ScholarshipQuery {
    fn default() -> Self {
        Self {
            search: None,
            country: None,
            category: None,
            sort: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ScholarshipQuery {
    /// from_params
    ///
    /// Normalises the raw parameters. Blank strings count as absent, `page` and
    /// `limit` fall back to their defaults when missing, non-numeric or zero, and
    /// `limit` is capped at `MAX_LIMIT`. `sortOrder` is ascending unless it is
    /// exactly `desc`.
    ///
    /// # Errors
    /// `AppError::Validation` when `category` is not one of the known categories,
    /// or when `page` is so large that its offset cannot be expressed.
    pub fn from_params(params: ScholarshipSearchParams) -> Result<Self, AppError> {
        let category = match non_blank(params.category) {
            Some(raw) => Some(
                ScholarshipCategory::parse(&raw)
                    .ok_or_else(|| AppError::validation(format!("Unknown category: {raw}")))?,
            ),
            None => None,
        };

        let order = match params.sort_order.as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        let sort = params
            .sort_by
            .as_deref()
            .and_then(SortKey::parse)
            .map(|key| (key, order));

        let page = positive(params.page).unwrap_or(DEFAULT_PAGE);
        let limit = positive(params.limit).unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        // The store takes skip as a signed 64-bit count.
        let in_range = (page - 1)
            .checked_mul(limit)
            .is_some_and(|skip| i64::try_from(skip).is_ok());
        if !in_range {
            return Err(AppError::validation(format!("Page out of range: {page}")));
        }

        Ok(Self {
            search: non_blank(params.search),
            country: non_blank(params.country),
            category,
            sort,
            page,
            limit,
        })
    }

    /// filter
    ///
    /// Store filter: an `$or` of case-insensitive regexes over name, university
    /// and degree, AND-ed with exact country and category matches. The search
    /// text is escaped, so it always matches literally.
    pub fn filter(&self) -> Document {
        let mut filter = Document::new();

        if let Some(search) = &self.search {
            let pattern = Bson::RegularExpression(Regex {
                pattern: escape_regex(search),
                options: "i".to_string(),
            });
            filter.insert(
                "$or",
                vec![
                    doc! { "scholarshipName": pattern.clone() },
                    doc! { "universityName": pattern.clone() },
                    doc! { "degree": pattern },
                ],
            );
        }
        if let Some(country) = &self.country {
            filter.insert("universityCountry", country.as_str());
        }
        if let Some(category) = self.category {
            filter.insert("scholarshipCategory", category.as_str());
        }

        filter
    }

    /// Store sort document, `None` when the results are unordered.
    pub fn sort(&self) -> Option<Document> {
        self.sort.map(|(key, order)| {
            let mut sort = Document::new();
            sort.insert(key.field(), order.direction());
            sort
        })
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// `ceil(total / limit)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn category(&self) -> Option<ScholarshipCategory> {
        self.category
    }

    pub fn ordering(&self) -> Option<(SortKey, SortOrder)> {
        self.sort
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive(value: Option<String>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}

/// Backslash-escapes every regex metacharacter.
pub fn escape_regex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
