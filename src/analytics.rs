use bson::{Bson, Document, doc};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{Application, GroupCount, PaymentStatus},
    repository::{StoreError, StoreResult},
};

pub const UNIVERSITY_LIMIT: i64 = 10;
pub const DEFAULT_TOP_SCHOLARSHIPS: i64 = 6;
pub const MAX_TOP_SCHOLARSHIPS: i64 = 50;

/// GroupField
///
/// Dimensions the reporter can group applications by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    University,
    Category,
    ScholarshipName,
}

impl GroupField {
    pub fn field(self) -> &'static str {
        match self {
            Self::University => "universityName",
            Self::Category => "scholarshipCategory",
            Self::ScholarshipName => "scholarshipName",
        }
    }
}

/// group_pipeline
///
/// `$group` by the field with a count, sorted by count descending and then by
/// key ascending so equal counts come back in a stable order. Rows are
/// projected to `{name, count}`.
pub fn group_pipeline(by: GroupField, limit: Option<i64>) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$group": { "_id": format!("${}", by.field()), "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
    ];
    if let Some(limit) = limit {
        pipeline.push(doc! { "$limit": limit });
    }
    pipeline.push(doc! { "$project": { "_id": 0, "name": "$_id", "count": 1 } });
    pipeline
}

/// Projected output row of `group_pipeline`.
#[derive(Deserialize)]
struct GroupRow {
    #[serde(default)]
    name: Option<Bson>,
    count: Bson,
}

impl TryFrom<GroupRow> for GroupCount {
    type Error = StoreError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        let name = match row.name {
            Some(Bson::String(s)) => Some(s),
            Some(Bson::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        // 32- or 64-bit depending on the server; doubles only when integral.
        let count = match row.count {
            Bson::Int32(n) => i64::from(n),
            Bson::Int64(n) => n,
            Bson::Double(n) if n.is_finite() && n.fract() == 0.0 => n as i64,
            other => {
                return Err(StoreError::UnexpectedValue {
                    field: "count",
                    value: other.to_string(),
                });
            }
        };
        Ok(Self { name, count })
    }
}

/// Decodes one row produced by `group_pipeline`.
pub fn read_group_row(row: Document) -> StoreResult<GroupCount> {
    bson::from_document::<GroupRow>(row)?.try_into()
}

/// Clamps the `limit` of `/analytics/top-scholarships`.
pub fn top_scholarships_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_TOP_SCHOLARSHIPS)
        .clamp(1, MAX_TOP_SCHOLARSHIPS)
}

/// SeriesRange
///
/// `Week` is seven daily buckets, `Quarter` twelve rolling seven-day buckets and
/// `Year` twelve calendar months. Every range ends with the bucket holding today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesRange {
    #[default]
    Week,
    Quarter,
    Year,
}

impl SeriesRange {
    /// Parses the `range` query value. Absent means `Week`.
    ///
    /// # Errors
    /// `AppError::Validation` for any other value.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") | Some("week") => Ok(Self::Week),
            Some("quarter") => Ok(Self::Quarter),
            Some("year") => Ok(Self::Year),
            Some(other) => Err(AppError::validation(format!(
                "Unknown range: {other} (expected week, quarter or year)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Start (inclusive, UTC midnight) of the oldest bucket for a series ending at `now`.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let starts = self.bucket_starts(now.date_naive());
        midnight(starts[0])
    }

    fn bucket_starts(self, today: NaiveDate) -> Vec<NaiveDate> {
        match self {
            Self::Week => (0..7).rev().map(|back| today - Duration::days(back)).collect(),
            Self::Quarter => {
                let first = today - Duration::days(12 * 7 - 1);
                (0..12).map(|i| first + Duration::days(i * 7)).collect()
            }
            Self::Year => {
                let current = today.year() * 12 + today.month0() as i32;
                (current - 11..=current)
                    .filter_map(|m| {
                        NaiveDate::from_ymd_opt(m.div_euclid(12), m.rem_euclid(12) as u32 + 1, 1)
                    })
                    .collect()
            }
        }
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            Self::Year => start.format("%Y-%m").to_string(),
            _ => start.format("%Y-%m-%d").to_string(),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// bucket_series
///
/// Counts `dates` into the buckets of `range` ending at `now`. Returns the
/// labels and the zero-filled counts, oldest first. Dates outside the window
/// are ignored.
pub fn bucket_series(
    range: SeriesRange,
    now: DateTime<Utc>,
    dates: &[DateTime<Utc>],
) -> (Vec<String>, Vec<u64>) {
    let starts = range.bucket_starts(now.date_naive());
    let mut counts = vec![0u64; starts.len()];

    let window_start = starts[0];
    let today = now.date_naive();

    for date in dates {
        let day = date.date_naive();
        if day < window_start || day > today {
            continue;
        }
        // Last bucket whose start is not after the day.
        if let Some(index) = starts.iter().rposition(|start| *start <= day) {
            counts[index] += 1;
        }
    }

    let labels = starts.iter().map(|start| range.label(*start)).collect();
    (labels, counts)
}

/// Sum of application fee plus service charge over paid applications.
pub fn sum_paid_fees(applications: &[Application]) -> f64 {
    applications
        .iter()
        .filter(|app| app.payment_status == PaymentStatus::Paid)
        .map(|app| app.application_fees + app.service_charge)
        .sum()
}

pub fn format_fees(total: f64) -> String {
    format!("{total:.2}")
}
