//! Stable single-field sorting over wire field names.
//!
//! The comparator is total: any pair of field values compares without
//! panicking, whatever the mix of types or missing data. Sorting
//! returns a new vector and leaves the input untouched; `None` for the
//! field name means "keep the original order".
//!
//! Date-typed columns get special treatment. Each sortable record names
//! its date columns in [`SortKey::DATE_FIELDS`]; values in those
//! columns are compared as points in time, and records whose value is
//! missing or unparseable land after every dated record *in both
//! directions* -- flipping the direction must not drag the undated
//! tail to the front.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use planboard_model::datetime::{format_date, format_datetime, parse_instant};
use planboard_model::{Plan, QuarterlyReport, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// A single field value as the comparator sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(Date),
    DateTime(PrimitiveDateTime),
}

impl FieldValue {
    fn as_instant(&self) -> Option<PrimitiveDateTime> {
        match self {
            FieldValue::Date(d) => Some(d.midnight()),
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::Text(s) => parse_instant(s),
            _ => None,
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Int(v) => Some(Decimal::from(*v)),
            FieldValue::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Fallback representation for pairs no other rule covers.
    fn display_string(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Decimal(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => format_date(*d),
            FieldValue::DateTime(dt) => format_datetime(*dt),
        }
    }
}

/// Field access by verbatim wire name, plus the record's date columns.
pub trait SortKey {
    const DATE_FIELDS: &'static [&'static str];

    /// Value of the named wire field; unknown names yield `Missing`,
    /// which leaves the relative order of all records unchanged.
    fn sort_field(&self, field: &str) -> FieldValue;
}

/// Sort a slice by one wire field, using the record's own date-column
/// list. Returns a sorted copy; the sort is stable.
pub fn sort_records<R: SortKey + Clone>(
    records: &[R],
    field: Option<&str>,
    direction: SortDirection,
) -> Vec<R> {
    sort_records_with(records, field, direction, R::DATE_FIELDS)
}

/// Same as [`sort_records`] with an explicit date-column set, for
/// callers that treat extra columns as dates.
pub fn sort_records_with<R: SortKey + Clone>(
    records: &[R],
    field: Option<&str>,
    direction: SortDirection,
    date_fields: &[&str],
) -> Vec<R> {
    let mut out: Vec<R> = records.to_vec();
    let Some(field) = field else {
        return out;
    };
    out.sort_by(|a, b| {
        compare_field_values(
            &a.sort_field(field),
            &b.sort_field(field),
            field,
            direction,
            date_fields,
        )
    });
    out
}

/// The comparator itself.
///
/// Precedence: date columns first (chronological, missing always
/// last), then text-text (case-insensitive), then the missing rules
/// (missing after present ascending, before present descending), then
/// numeric pairs, then a string-representation fallback for anything
/// left.
pub fn compare_field_values(
    a: &FieldValue,
    b: &FieldValue,
    field: &str,
    direction: SortDirection,
    date_fields: &[&str],
) -> Ordering {
    if date_fields.contains(&field) {
        return match (a.as_instant(), b.as_instant()) {
            (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            // Undated records trail the dated ones either way round.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
    }
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => {
            direction.apply(x.to_lowercase().cmp(&y.to_lowercase()))
        }
        (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
        (FieldValue::Missing, _) => match direction {
            SortDirection::Ascending => Ordering::Greater,
            SortDirection::Descending => Ordering::Less,
        },
        (_, FieldValue::Missing) => match direction {
            SortDirection::Ascending => Ordering::Less,
            SortDirection::Descending => Ordering::Greater,
        },
        _ => match (a.as_decimal(), b.as_decimal()) {
            (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            _ => direction.apply(a.display_string().cmp(&b.display_string())),
        },
    }
}

// ──────────────────────────────────────────────
// SortKey per record shape
// ──────────────────────────────────────────────

fn opt_int(v: Option<i64>) -> FieldValue {
    v.map_or(FieldValue::Missing, FieldValue::Int)
}

fn opt_score(v: Option<i32>) -> FieldValue {
    v.map_or(FieldValue::Missing, |s| FieldValue::Int(i64::from(s)))
}

fn opt_decimal(v: Option<Decimal>) -> FieldValue {
    v.map_or(FieldValue::Missing, FieldValue::Decimal)
}

fn opt_text(v: Option<&str>) -> FieldValue {
    v.map_or(FieldValue::Missing, |s| FieldValue::Text(s.to_string()))
}

fn opt_date(v: Option<Date>) -> FieldValue {
    v.map_or(FieldValue::Missing, FieldValue::Date)
}

fn opt_datetime(v: Option<PrimitiveDateTime>) -> FieldValue {
    v.map_or(FieldValue::Missing, FieldValue::DateTime)
}

impl SortKey for Plan {
    const DATE_FIELDS: &'static [&'static str] = &["startDate", "endDate", "createdAt"];

    fn sort_field(&self, field: &str) -> FieldValue {
        match field {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(self.name.clone()),
            "description" => opt_text(self.description.as_deref()),
            "targetValue" => opt_decimal(self.target_value),
            "startDate" => opt_date(self.start_date),
            "endDate" => opt_date(self.end_date),
            "executorUserIds" => {
                let joined = self
                    .executor_user_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                FieldValue::Text(joined)
            }
            "createdByUserId" => opt_int(self.created_by_user_id),
            "createdAt" => opt_datetime(self.created_at),
            _ => FieldValue::Missing,
        }
    }
}

impl SortKey for QuarterlyReport {
    const DATE_FIELDS: &'static [&'static str] = &["createdAt"];

    fn sort_field(&self, field: &str) -> FieldValue {
        match field {
            "id" => FieldValue::Int(self.id),
            "planId" => FieldValue::Int(self.plan_id),
            "reportingUserId" => FieldValue::Int(self.reporting_user_id),
            "assessedByUserId" => opt_int(self.assessed_by_user_id),
            "year" => FieldValue::Int(i64::from(self.year)),
            "quarter" => FieldValue::Int(i64::from(self.quarter)),
            "actualValue" => opt_decimal(self.actual_value),
            "analystAssessmentScore" => opt_score(self.analyst_assessment_score),
            "createdAt" => opt_datetime(self.created_at),
            _ => FieldValue::Missing,
        }
    }
}

impl SortKey for User {
    const DATE_FIELDS: &'static [&'static str] = &[];

    fn sort_field(&self, field: &str) -> FieldValue {
        match field {
            "id" => FieldValue::Int(self.id),
            "email" => FieldValue::Text(self.email.clone()),
            "fullName" => opt_text(self.full_name.as_deref()),
            "userRole" => FieldValue::Text(self.user_role.as_str().to_string()),
            _ => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::{date, datetime};

    fn plan(id: i64, name: &str, end: Option<Date>) -> Plan {
        Plan {
            id,
            name: name.to_string(),
            description: None,
            target_value: None,
            start_date: None,
            end_date: end,
            executor_user_ids: BTreeSet::new(),
            created_by_user_id: None,
            created_at: None,
        }
    }

    fn report(id: i64, created: Option<PrimitiveDateTime>, score: Option<i32>) -> QuarterlyReport {
        QuarterlyReport {
            id,
            plan_id: 7,
            reporting_user_id: 3,
            assessed_by_user_id: None,
            year: 2024,
            quarter: 2,
            actual_value: None,
            analyst_assessment_score: score,
            created_at: created,
        }
    }

    fn ids<R: SortKey + Clone>(records: &[R], field: &str, direction: SortDirection) -> Vec<i64>
    where
        R: IdOf,
    {
        sort_records(records, Some(field), direction)
            .iter()
            .map(IdOf::id_of)
            .collect()
    }

    trait IdOf {
        fn id_of(&self) -> i64;
    }
    impl IdOf for Plan {
        fn id_of(&self) -> i64 {
            self.id
        }
    }
    impl IdOf for QuarterlyReport {
        fn id_of(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn no_field_returns_a_copy_in_original_order() {
        let plans = vec![plan(3, "c", None), plan(1, "a", None)];
        let out = sort_records(&plans, None, SortDirection::Ascending);
        let got: Vec<i64> = out.iter().map(|p| p.id).collect();
        assert_eq!(got, vec![3, 1]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let plans = vec![
            plan(1, "beta", None),
            plan(2, "Alpha", None),
            plan(3, "ALPINE", None),
        ];
        assert_eq!(ids(&plans, "name", SortDirection::Ascending), vec![2, 3, 1]);
        assert_eq!(
            ids(&plans, "name", SortDirection::Descending),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn numeric_sort_compares_numbers_not_digits() {
        let reports = vec![
            report(9, None, None),
            report(10, None, None),
            report(2, None, None),
        ];
        assert_eq!(ids(&reports, "id", SortDirection::Ascending), vec![2, 9, 10]);
    }

    #[test]
    fn missing_dates_trail_in_both_directions() {
        let plans = vec![
            plan(1, "a", None),
            plan(2, "b", Some(date!(2024 - 06 - 30))),
            plan(3, "c", Some(date!(2024 - 03 - 31))),
        ];
        assert_eq!(
            ids(&plans, "endDate", SortDirection::Ascending),
            vec![3, 2, 1]
        );
        assert_eq!(
            ids(&plans, "endDate", SortDirection::Descending),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn datetime_columns_sort_chronologically() {
        let reports = vec![
            report(1, Some(datetime!(2024-07-02 09:00:00)), None),
            report(2, None, None),
            report(3, Some(datetime!(2024-04-01 10:00:00)), None),
        ];
        assert_eq!(
            ids(&reports, "createdAt", SortDirection::Descending),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn missing_generic_values_flip_with_direction() {
        let reports = vec![
            report(1, None, Some(4)),
            report(2, None, None),
            report(3, None, Some(2)),
        ];
        assert_eq!(
            ids(&reports, "analystAssessmentScore", SortDirection::Ascending),
            vec![3, 1, 2]
        );
        assert_eq!(
            ids(&reports, "analystAssessmentScore", SortDirection::Descending),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn unknown_field_keeps_relative_order() {
        let plans = vec![plan(5, "e", None), plan(4, "d", None), plan(6, "f", None)];
        assert_eq!(
            ids(&plans, "noSuchField", SortDirection::Descending),
            vec![5, 4, 6]
        );
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let reports = vec![
            report(1, None, Some(3)),
            report(2, None, Some(3)),
            report(3, None, Some(3)),
        ];
        assert_eq!(
            ids(&reports, "analystAssessmentScore", SortDirection::Ascending),
            vec![1, 2, 3]
        );
        assert_eq!(
            ids(&reports, "analystAssessmentScore", SortDirection::Descending),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn comparator_is_total_and_antisymmetric_over_any_value_mix() {
        let values = vec![
            FieldValue::Missing,
            FieldValue::Int(2),
            FieldValue::Int(10),
            FieldValue::Decimal(Decimal::new(125, 1)),
            FieldValue::Text("beta".into()),
            FieldValue::Text("10".into()),
            FieldValue::Date(date!(2024 - 06 - 30)),
            FieldValue::DateTime(datetime!(2024-06-30 12:00:00)),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            for a in &values {
                for b in &values {
                    let ab = compare_field_values(a, b, "anything", direction, &[]);
                    let ba = compare_field_values(b, a, "anything", direction, &[]);
                    assert_eq!(ab, ba.reverse(), "{a:?} vs {b:?} ({direction:?})");
                }
                let aa = compare_field_values(a, a, "anything", direction, &[]);
                assert_eq!(aa, Ordering::Equal);
            }
        }
    }

    #[test]
    fn date_columns_parse_text_values_and_push_garbage_last() {
        let typed = FieldValue::Date(date!(2024 - 06 - 30));
        let text = FieldValue::Text("2024-07-01T08:00:00".into());
        // A text timestamp in a date column compares as an instant, so
        // it lands relative to typed dates chronologically.
        assert_eq!(
            compare_field_values(&typed, &text, "startDate", SortDirection::Ascending, &[
                "startDate"
            ]),
            Ordering::Less
        );
        assert_eq!(
            compare_field_values(&text, &typed, "startDate", SortDirection::Descending, &[
                "startDate"
            ]),
            Ordering::Less
        );

        let garbage = FieldValue::Text("next week".into());
        assert_eq!(
            compare_field_values(&garbage, &text, "startDate", SortDirection::Descending, &[
                "startDate"
            ]),
            Ordering::Greater
        );
    }
}
