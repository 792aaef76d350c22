use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::warn;
use uuid::Uuid;

use crate::{
    core::{
        sqlx_utils::{SqlxBinds, WhereBuilder},
        utils::{parse_bool, parse_iso_datetime},
    },
    model::promotion::Promotion,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DateFilter {
    #[default]
    Any,
    /// Starts on `date` (exact) or on or after it.
    StartDate {
        date: DateTime<FixedOffset>,
        exact: bool,
    },
    /// Ends on `date` (exact) or on or before it.
    EndDate {
        date: DateTime<FixedOffset>,
        exact: bool,
    },
    /// Promotion interval overlaps `[start, end]`.
    Range {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// Conjunction of optional predicates over promotions. Every `Some` field has
/// to match; an empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromotionFilter {
    pub name: Option<String>,
    pub product_id: Option<String>,
    pub active_status: Option<bool>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub date: DateFilter,
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|val| val.as_str())
        .filter(|val| !val.trim().is_empty())
}

fn lenient<T>(
    params: &HashMap<String, String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = non_empty(params, key)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        warn!("ignoring invalid {} filter: {}", key, raw);
    }
    parsed
}

impl PromotionFilter {
    /// Build a filter from query-string parameters.
    ///
    /// Never fails: values that do not parse are logged and treated as if the
    /// parameter was not supplied.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let exact_match = lenient(params, "exact_match", parse_bool).unwrap_or(false);
        let exact_start =
            lenient(params, "exact_match_start_date", parse_bool).unwrap_or(exact_match);
        let exact_end = lenient(params, "exact_match_end_date", parse_bool).unwrap_or(exact_match);
        let start_date = lenient(params, "start_date", parse_iso_datetime);
        let end_date = lenient(params, "end_date", parse_iso_datetime);

        let date = match (start_date, end_date) {
            (Some(start), Some(end)) => DateFilter::Range { start, end },
            (Some(date), None) => DateFilter::StartDate {
                date,
                exact: exact_start,
            },
            (None, Some(date)) => DateFilter::EndDate {
                date,
                exact: exact_end,
            },
            (None, None) => DateFilter::Any,
        };

        Self {
            name: non_empty(params, "name").map(str::to_string),
            product_id: non_empty(params, "product_id").map(str::to_string),
            active_status: lenient(params, "active_status", parse_bool),
            created_by: lenient(params, "created_by", |val| Uuid::parse_str(val).ok()),
            updated_by: lenient(params, "updated_by", |val| Uuid::parse_str(val).ok()),
            date,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, promotion: &Promotion) -> bool {
        if let Some(name) = &self.name {
            if promotion.name != *name {
                return false;
            }
        }
        if let Some(product_id) = &self.product_id {
            if !promotion.has_product(product_id) {
                return false;
            }
        }
        if let Some(active_status) = self.active_status {
            if promotion.active_status != active_status {
                return false;
            }
        }
        if let Some(created_by) = self.created_by {
            if promotion.created_by != created_by {
                return false;
            }
        }
        if let Some(updated_by) = self.updated_by {
            if promotion.updated_by != updated_by {
                return false;
            }
        }
        match self.date {
            DateFilter::Any => true,
            DateFilter::StartDate { date, exact: true } => promotion.start_date == date,
            DateFilter::StartDate { date, exact: false } => promotion.start_date >= date,
            DateFilter::EndDate { date, exact: true } => promotion.end_date == date,
            DateFilter::EndDate { date, exact: false } => promotion.end_date <= date,
            DateFilter::Range { start, end } => {
                promotion.start_date <= end && promotion.end_date >= start
            }
        }
    }

    /// Narrow `promotions` to the matching ones, keeping their order.
    pub fn apply(&self, promotions: Vec<Promotion>) -> Vec<Promotion> {
        promotions
            .into_iter()
            .filter(|promotion| self.matches(promotion))
            .collect()
    }

    /// Render the conjunction as `WHERE` conditions with positional binds.
    pub fn to_sql(&self) -> WhereBuilder {
        let mut wheres = WhereBuilder::new();
        if let Some(name) = &self.name {
            wheres.push("name = {}", SqlxBinds::String(name.clone()));
        }
        if let Some(product_id) = &self.product_id {
            wheres.push("{} = ANY(product_ids)", SqlxBinds::String(product_id.clone()));
        }
        if let Some(active_status) = self.active_status {
            wheres.push("active_status = {}", SqlxBinds::Bool(active_status));
        }
        if let Some(created_by) = self.created_by {
            wheres.push("created_by = {}", SqlxBinds::Uuid(created_by));
        }
        if let Some(updated_by) = self.updated_by {
            wheres.push("updated_by = {}", SqlxBinds::Uuid(updated_by));
        }
        match self.date {
            DateFilter::Any => {}
            DateFilter::StartDate { date, exact } => {
                let condition = if exact { "start_date = {}" } else { "start_date >= {}" };
                wheres.push(condition, SqlxBinds::DateTimeFixedOffset(date));
            }
            DateFilter::EndDate { date, exact } => {
                let condition = if exact { "end_date = {}" } else { "end_date <= {}" };
                wheres.push(condition, SqlxBinds::DateTimeFixedOffset(date));
            }
            DateFilter::Range { start, end } => {
                wheres.push("start_date <= {}", SqlxBinds::DateTimeFixedOffset(end));
                wheres.push("end_date >= {}", SqlxBinds::DateTimeFixedOffset(start));
            }
        }
        wheres
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect()
    }

    fn promotion(name: &str, start: &str, end: &str, active: bool) -> Promotion {
        Promotion::from_json(&json!({
            "name": name,
            "start_date": start,
            "end_date": end,
            "active_status": active,
            "created_by": "0b7d6d8e-3a48-4a3e-9c85-4a1c1b3e9a01",
            "updated_by": "6f1e7a1c-8c42-4d8e-a4e5-0f8a2b3c4d5e",
            "product_ids": [format!("{}-product", name)],
        }))
        .unwrap()
    }

    fn names(promotions: &[Promotion]) -> Vec<&str> {
        promotions.iter().map(|x| x.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let filter = PromotionFilter::from_query(&HashMap::new());
        assert!(filter.is_empty());
        let result = filter.apply(vec![
            promotion("a", "2023-12-01", "2023-12-31", true),
            promotion("b", "2023-12-11", "2024-01-05", false),
        ]);
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_date_range_overlap() {
        let filter = PromotionFilter::from_query(&query(&[
            ("start_date", "2023-12-20"),
            ("end_date", "2023-12-28"),
        ]));
        assert!(matches!(filter.date, DateFilter::Range { .. }));
        let result = filter.apply(vec![
            promotion("december", "2023-12-01", "2023-12-31", true),
            promotion("holiday", "2023-12-25", "2024-01-05", true),
            promotion("november", "2023-11-01", "2023-11-30", true),
        ]);
        assert_eq!(names(&result), vec!["december", "holiday"]);
    }

    #[test]
    fn test_start_date_exact_and_open() {
        let promotions = vec![
            promotion("first", "2023-12-01", "2023-12-31", true),
            promotion("second", "2023-12-11", "2023-12-31", true),
        ];
        let exact = PromotionFilter::from_query(&query(&[
            ("start_date", "2023-12-01"),
            ("exact_match", "true"),
        ]));
        assert_eq!(names(&exact.apply(promotions.clone())), vec!["first"]);

        let open = PromotionFilter::from_query(&query(&[("start_date", "2023-12-01")]));
        assert_eq!(names(&open.apply(promotions)), vec!["first", "second"]);
    }

    #[test]
    fn test_end_date_exact_and_open() {
        let promotions = vec![
            promotion("first", "2023-12-01", "2023-12-20", true),
            promotion("second", "2023-12-01", "2023-12-31", true),
        ];
        let exact = PromotionFilter::from_query(&query(&[
            ("end_date", "2023-12-31"),
            ("exact_match_end_date", "true"),
        ]));
        assert_eq!(names(&exact.apply(promotions.clone())), vec!["second"]);

        let open = PromotionFilter::from_query(&query(&[("end_date", "2023-12-20")]));
        assert_eq!(names(&open.apply(promotions)), vec!["first"]);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let promotions = vec![
            promotion("sale", "2023-12-01", "2023-12-31", true),
            promotion("sale", "2023-12-01", "2023-12-31", false),
            promotion("other", "2023-12-01", "2023-12-31", true),
        ];
        let filter = PromotionFilter::from_query(&query(&[
            ("name", "sale"),
            ("product_id", "sale-product"),
            ("active_status", "True"),
        ]));
        let result = filter.apply(promotions);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "sale");
        assert!(result[0].active_status);
    }

    #[test]
    fn test_name_is_case_sensitive() {
        let filter = PromotionFilter::from_query(&query(&[("name", "Sale")]));
        let result = filter.apply(vec![promotion("sale", "2023-12-01", "2023-12-31", true)]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_creator_and_updater() {
        let filter = PromotionFilter::from_query(&query(&[
            ("created_by", "0b7d6d8e-3a48-4a3e-9c85-4a1c1b3e9a01"),
            ("updated_by", "6f1e7a1c-8c42-4d8e-a4e5-0f8a2b3c4d5e"),
        ]));
        assert!(filter.matches(&promotion("a", "2023-12-01", "2023-12-31", true)));

        let filter = PromotionFilter::from_query(&query(&[(
            "updated_by",
            "0b7d6d8e-3a48-4a3e-9c85-4a1c1b3e9a01",
        )]));
        assert!(!filter.matches(&promotion("a", "2023-12-01", "2023-12-31", true)));
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let filter = PromotionFilter::from_query(&query(&[
            ("start_date", "Wrong Date"),
            ("end_date", "Wrong Date"),
            ("active_status", "sometimes"),
            ("created_by", "not-a-uuid"),
        ]));
        assert!(filter.is_empty());

        let filter = PromotionFilter::from_query(&query(&[
            ("name", "a"),
            ("start_date", "Wrong Date"),
        ]));
        let result = filter.apply(vec![
            promotion("a", "2023-12-01", "2023-12-31", true),
            promotion("b", "2023-12-01", "2023-12-31", true),
        ]);
        assert_eq!(names(&result), vec!["a"]);
    }

    #[test]
    fn test_one_valid_date_falls_back_to_single_date() {
        let filter = PromotionFilter::from_query(&query(&[
            ("start_date", "2023-12-01"),
            ("end_date", "Wrong Date"),
        ]));
        assert!(matches!(
            filter.date,
            DateFilter::StartDate { exact: false, .. }
        ));
    }

    #[test]
    fn test_to_sql_empty() {
        let wheres = PromotionFilter::default().to_sql();
        assert!(wheres.filters.is_empty());
        assert!(wheres.binds.is_empty());
    }

    #[test]
    fn test_to_sql_numbering() {
        let params = query(&[
            ("name", "sale"),
            ("product_id", "p-1"),
            ("active_status", "false"),
            ("start_date", "2023-12-20"),
            ("end_date", "2023-12-28"),
        ]);
        let wheres = PromotionFilter::from_query(&params).to_sql();
        assert_eq!(
            wheres.filters,
            vec![
                "name = $1",
                "$2 = ANY(product_ids)",
                "active_status = $3",
                "start_date <= $4",
                "end_date >= $5",
            ]
        );
        assert_eq!(wheres.binds[2], SqlxBinds::Bool(false));
    }

    #[test]
    fn test_to_sql_exact_dates() {
        let params = query(&[("end_date", "2023-12-31"), ("exact_match", "true")]);
        let wheres = PromotionFilter::from_query(&params).to_sql();
        assert_eq!(wheres.filters, vec!["end_date = $1"]);
    }
}
