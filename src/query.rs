//! Named query vocabulary, ad-hoc alert filters and pagination.
//!
//! Everything here compiles down to a sea-orm [`Condition`]; the alert store
//! adds the soft-delete predicate and ordering on top.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};

use crate::entities::alert;
use crate::error::AppError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Fixed set of named predicates over `is_verified` and `created_at`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedQuery {
    Verified,
    NotVerified1h,
    NotVerifiedLess1h,
    NotVerifiedIn24h,
}

impl NamedQuery {
    pub const NAMES: [&'static str; 4] = [
        "verified",
        "not_verified_1h",
        "not_verified_less_1h",
        "not_verified_in_24h",
    ];

    pub fn parse(name: &str) -> Result<Self, AppError> {
        match name {
            "verified" => Ok(NamedQuery::Verified),
            "not_verified_1h" => Ok(NamedQuery::NotVerified1h),
            "not_verified_less_1h" => Ok(NamedQuery::NotVerifiedLess1h),
            "not_verified_in_24h" => Ok(NamedQuery::NotVerifiedIn24h),
            _ => Err(AppError::InvalidArgument {
                message: "Invalid query type".to_string(),
                valid_queries: Some(Self::NAMES.to_vec()),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedQuery::Verified => "verified",
            NamedQuery::NotVerified1h => "not_verified_1h",
            NamedQuery::NotVerifiedLess1h => "not_verified_less_1h",
            NamedQuery::NotVerifiedIn24h => "not_verified_in_24h",
        }
    }

    /// Predicate evaluated against `now`; the time windows are relative to it.
    pub fn condition(self, now: NaiveDateTime) -> Condition {
        let hour_ago = now - Duration::hours(1);
        let day_ago = now - Duration::hours(24);

        match self {
            NamedQuery::Verified => Condition::all().add(alert::Column::IsVerified.eq(true)),
            NamedQuery::NotVerified1h => Condition::all()
                .add(alert::Column::IsVerified.eq(false))
                .add(alert::Column::CreatedAt.lte(hour_ago)),
            NamedQuery::NotVerifiedLess1h => Condition::all()
                .add(alert::Column::IsVerified.eq(false))
                .add(alert::Column::CreatedAt.gt(hour_ago)),
            NamedQuery::NotVerifiedIn24h => Condition::all()
                .add(alert::Column::IsVerified.eq(false))
                .add(alert::Column::CreatedAt.lte(day_ago)),
        }
    }
}

/// Dashboard counter: alerts with the given verification flag created within
/// the last hour.
pub fn recent_count_condition(is_verified: bool, now: NaiveDateTime) -> Condition {
    Condition::all()
        .add(alert::Column::IsVerified.eq(is_verified))
        .add(alert::Column::CreatedAt.gte(now - Duration::hours(1)))
}

pub fn unverified_condition() -> Condition {
    Condition::all().add(alert::Column::IsVerified.eq(false))
}

/// 1-indexed page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Non-numeric or non-positive values fall back to the defaults silently.
    /// `limit` is capped at [`MAX_PAGE_SIZE`]; a page whose row offset does
    /// not fit the database's signed 64-bit OFFSET falls back to page 1.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        fn positive(raw: Option<&str>, default: u64) -> u64 {
            raw.and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        }

        let limit = positive(limit, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let page = positive(page, DEFAULT_PAGE);
        let page = match (page - 1).checked_mul(limit) {
            Some(offset) if offset <= i64::MAX as u64 => page,
            _ => DEFAULT_PAGE,
        };

        Self { page, limit }
    }

    /// Zero-based page index and rows to skip.
    pub fn offset(self) -> u64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AlertPage {
    pub alerts: Vec<alert::Model>,
    pub pagination: Pagination,
}

/// Ad-hoc listing filter; every present criterion is ANDed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub region: Option<String>,
    pub district: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub alert_id: Option<i32>,
    pub alert_case_name: Option<String>,
    pub person_reporting: Option<String>,
    pub status: Option<String>,
    pub is_verified: Option<bool>,
}

impl AlertFilter {
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(region) = &self.region {
            cond = cond.add(alert::Column::Region.eq(region.as_str()));
        }
        if let Some(district) = &self.district {
            cond = cond.add(alert::Column::AlertCaseDistrict.eq(district.as_str()));
        }
        if let Some(from) = self.from_date {
            cond = cond.add(alert::Column::Date.gte(from));
        }
        if let Some(to) = self.to_date {
            cond = cond.add(alert::Column::Date.lte(to));
        }
        if let Some(id) = self.alert_id {
            cond = cond.add(alert::Column::Id.eq(id));
        }
        if let Some(name) = &self.alert_case_name {
            cond = cond.add(alert::Column::AlertCaseName.contains(name));
        }
        if let Some(reporter) = &self.person_reporting {
            cond = cond.add(alert::Column::PersonReporting.contains(reporter));
        }
        if let Some(status) = &self.status {
            cond = cond.add(alert::Column::Status.eq(status.as_str()));
        }
        if let Some(verified) = self.is_verified {
            cond = cond.add(alert::Column::IsVerified.eq(verified));
        }

        cond
    }
}

/// Raw query string of `GET /alerts`. Values arrive as strings so that bad
/// pagination input can be defaulted instead of rejected by the extractor.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlertListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub alert_id: Option<String>,
    pub alert_case_name: Option<String>,
    pub person_reporting: Option<String>,
    pub status: Option<String>,
    pub is_verified: Option<String>,
}

impl AlertListParams {
    pub fn into_parts(self) -> Result<(AlertFilter, PageRequest), AppError> {
        let page = PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref());

        let filter = AlertFilter {
            region: non_empty(self.region),
            district: non_empty(self.district),
            from_date: non_empty(self.from_date)
                .map(|v| parse_date("from_date", &v))
                .transpose()?,
            to_date: non_empty(self.to_date)
                .map(|v| parse_date("to_date", &v))
                .transpose()?,
            alert_id: non_empty(self.alert_id)
                .map(|v| {
                    v.trim()
                        .parse::<i32>()
                        .map_err(|_| AppError::invalid_argument("alert_id must be an integer"))
                })
                .transpose()?,
            alert_case_name: non_empty(self.alert_case_name),
            person_reporting: non_empty(self.person_reporting),
            status: non_empty(self.status),
            is_verified: non_empty(self.is_verified)
                .map(|v| parse_bool(&v))
                .transpose()?,
        };

        Ok((filter, page))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_argument(format!("{field} must be a YYYY-MM-DD date")))
}

fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::invalid_argument("is_verified must be true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_query_round_trips_through_its_name() {
        for name in NamedQuery::NAMES {
            assert_eq!(NamedQuery::parse(name).unwrap().name(), name);
        }
    }

    #[test]
    fn unknown_named_query_lists_valid_names() {
        match NamedQuery::parse("everything") {
            Err(AppError::InvalidArgument {
                valid_queries: Some(valid),
                ..
            }) => assert_eq!(valid, NamedQuery::NAMES.to_vec()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn page_request_defaults_on_garbage() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_raw(Some("abc"), Some("-4")),
            PageRequest { page: 1, limit: 50 }
        );
        assert_eq!(
            PageRequest::from_raw(Some("0"), Some("0")),
            PageRequest { page: 1, limit: 50 }
        );
        assert_eq!(
            PageRequest::from_raw(Some(" 3 "), Some("20")),
            PageRequest { page: 3, limit: 20 }
        );
    }

    #[test]
    fn page_request_clamps_huge_values() {
        let max = u64::MAX.to_string();

        let huge_limit = PageRequest::from_raw(None, Some(&max));
        assert_eq!(huge_limit, PageRequest { page: 1, limit: MAX_PAGE_SIZE });

        let huge_page = PageRequest::from_raw(Some(&max), Some("50"));
        assert_eq!(huge_page, PageRequest { page: 1, limit: 50 });

        let last_fitting = (i64::MAX as u64) / 500 + 1;
        let req = PageRequest::from_raw(Some(&last_fitting.to_string()), Some("500"));
        assert_eq!(req.page, last_fitting);
        assert!(req.offset() <= i64::MAX as u64);

        let past_it = PageRequest::from_raw(Some(&(last_fitting + 1).to_string()), Some("500"));
        assert_eq!(past_it.page, 1);
    }

    #[test]
    fn pages_round_up() {
        let req = PageRequest { page: 1, limit: 50 };
        assert_eq!(Pagination::new(req, 120).pages, 3);
        assert_eq!(Pagination::new(req, 100).pages, 2);
        assert_eq!(Pagination::new(req, 0).pages, 0);
    }

    #[test]
    fn list_params_parse_filters() {
        let params = AlertListParams {
            page: Some("2".into()),
            from_date: Some("2026-01-05".into()),
            alert_id: Some("17".into()),
            is_verified: Some("TRUE".into()),
            region: Some("   ".into()),
            ..Default::default()
        };

        let (filter, page) = params.into_parts().unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(filter.from_date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(filter.alert_id, Some(17));
        assert_eq!(filter.is_verified, Some(true));
        assert_eq!(filter.region, None);
    }

    #[test]
    fn malformed_filters_are_rejected() {
        let bad_date = AlertListParams {
            to_date: Some("05/01/2026".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_date.into_parts(),
            Err(AppError::InvalidArgument { .. })
        ));

        let bad_id = AlertListParams {
            alert_id: Some("seven".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_id.into_parts(),
            Err(AppError::InvalidArgument { .. })
        ));
    }
}
