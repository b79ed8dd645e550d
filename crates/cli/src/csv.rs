//! CSV export and import for the exchange workflow.
//!
//! Exports are spreadsheet-friendly: text cells are quote-escaped and
//! cells starting with `=`, `+`, `-` or `@` get an apostrophe prefix so
//! a spreadsheet never interprets user-entered text as a formula.
//! Machine cells (ids, dates, values) are written as-is.
//!
//! Import reads a reports CSV back. The header row is row 1; every
//! diagnostic names the 1-based row it came from. Blank rows are
//! skipped, a decimal comma in `actualValue` is tolerated, and rows
//! with problems are collected as errors without aborting the parse.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use planboard_model::datetime::{format_date, format_datetime};
use planboard_model::{NewReport, Plan, QuarterlyReport, User};

// ──────────────────────────────────────────────
// Export
// ──────────────────────────────────────────────

/// Escape a user-entered text cell: neutralize formula prefixes, then
/// quote when the content needs it.
fn text_cell(field: &str) -> String {
    let neutralized = match field.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{field}"),
        _ => field.to_string(),
    };
    if neutralized.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", neutralized.replace('"', "\"\""))
    } else {
        neutralized
    }
}

fn opt_date(d: Option<time::Date>) -> String {
    d.map(format_date).unwrap_or_default()
}

fn opt_decimal(d: Option<Decimal>) -> String {
    d.map(|v| v.to_string()).unwrap_or_default()
}

fn user_labels(users: &[User]) -> BTreeMap<i64, &str> {
    users.iter().map(|u| (u.id, u.label())).collect()
}

fn label_or_id(labels: &BTreeMap<i64, &str>, id: i64) -> String {
    labels
        .get(&id)
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("user {id}"))
}

/// Plans with executor and creator names resolved.
pub fn plans_to_csv(plans: &[Plan], users: &[User]) -> String {
    let labels = user_labels(users);
    let mut lines = Vec::with_capacity(plans.len() + 1);
    lines.push("id,name,description,startDate,endDate,targetValue,executors,createdBy".to_string());
    for plan in plans {
        let executors = plan
            .executor_user_ids
            .iter()
            .map(|id| label_or_id(&labels, *id))
            .collect::<Vec<_>>()
            .join("; ");
        let created_by = plan
            .created_by_user_id
            .map(|id| label_or_id(&labels, id))
            .unwrap_or_default();
        lines.push(
            [
                plan.id.to_string(),
                text_cell(&plan.name),
                text_cell(plan.description.as_deref().unwrap_or_default()),
                opt_date(plan.start_date),
                opt_date(plan.end_date),
                opt_decimal(plan.target_value),
                text_cell(&executors),
                text_cell(&created_by),
            ]
            .join(","),
        );
    }
    lines.join("\n") + "\n"
}

/// Reports with plan and user names resolved. The machine columns
/// (`planId`, `year`, `quarter`, `actualValue`, `score`,
/// `reportingUserId`) make the output re-importable.
pub fn reports_to_csv(reports: &[QuarterlyReport], plans: &[Plan], users: &[User]) -> String {
    let labels = user_labels(users);
    let plan_names: BTreeMap<i64, &str> = plans.iter().map(|p| (p.id, p.name.as_str())).collect();
    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(
        "id,planId,plan,year,quarter,actualValue,score,reportingUserId,reportedBy,assessedBy,createdAt"
            .to_string(),
    );
    for report in reports {
        let plan_name = plan_names
            .get(&report.plan_id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("plan {}", report.plan_id));
        let score = report
            .analyst_assessment_score
            .map(|s| s.to_string())
            .unwrap_or_default();
        let assessed_by = report
            .assessed_by_user_id
            .map(|id| label_or_id(&labels, id))
            .unwrap_or_default();
        let created_at = report.created_at.map(format_datetime).unwrap_or_default();
        lines.push(
            [
                report.id.to_string(),
                report.plan_id.to_string(),
                text_cell(&plan_name),
                report.year.to_string(),
                report.quarter.to_string(),
                opt_decimal(report.actual_value),
                score,
                report.reporting_user_id.to_string(),
                text_cell(&label_or_id(&labels, report.reporting_user_id)),
                text_cell(&assessed_by),
                created_at,
            ]
            .join(","),
        );
    }
    lines.join("\n") + "\n"
}

// ──────────────────────────────────────────────
// Import
// ──────────────────────────────────────────────

/// One successfully parsed CSV row and the 1-based row it came from.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub row: usize,
    pub report: NewReport,
}

/// Everything a parse produced: good rows and per-row diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<String>,
}

struct Columns {
    plan_id: usize,
    year: usize,
    quarter: usize,
    actual_value: usize,
    score: Option<usize>,
    reporting_user: Option<usize>,
}

/// Split one CSV line, honoring double-quoted cells with `""` escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }
    fields.push(current);
    fields
}

fn parse_row(
    fields: &[String],
    columns: &Columns,
    known_plans: &BTreeSet<i64>,
    default_reporting_user: Option<i64>,
) -> Result<NewReport, String> {
    let cell = |idx: usize| fields.get(idx).map(|s| s.trim()).unwrap_or("");

    let raw = cell(columns.plan_id);
    let plan_id: i64 = raw
        .parse()
        .map_err(|_| format!("invalid planId `{raw}`"))?;
    if plan_id <= 0 {
        return Err(format!("planId must be positive, got {plan_id}"));
    }
    if !known_plans.contains(&plan_id) {
        return Err(format!("unknown planId {plan_id}"));
    }

    let raw = cell(columns.year);
    let year: i32 = raw.parse().map_err(|_| format!("invalid year `{raw}`"))?;
    if !(2000..=2099).contains(&year) {
        return Err(format!("year {year} out of range 2000-2099"));
    }

    let raw = cell(columns.quarter);
    let quarter: u8 = raw
        .parse()
        .map_err(|_| format!("invalid quarter `{raw}`"))?;
    if !(1..=4).contains(&quarter) {
        return Err(format!("quarter {quarter} out of range 1-4"));
    }

    let raw = cell(columns.actual_value);
    if raw.is_empty() {
        return Err("missing actualValue".to_string());
    }
    let actual_value: Decimal = raw
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("invalid actualValue `{raw}`"))?;

    let analyst_assessment_score = match columns.score.map(cell) {
        None | Some("") => None,
        Some(raw) => {
            let score: i32 = raw.parse().map_err(|_| format!("invalid score `{raw}`"))?;
            if !(1..=5).contains(&score) {
                return Err(format!("score {score} out of range 1-5"));
            }
            Some(score)
        }
    };

    let reporting_user_id = match columns.reporting_user.map(cell) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| format!("invalid reportingUserId `{raw}`"))?,
        _ => default_reporting_user.ok_or("missing reportingUserId")?,
    };

    Ok(NewReport {
        plan_id,
        reporting_user_id,
        assessed_by_user_id: None,
        year,
        quarter,
        actual_value,
        analyst_assessment_score,
    })
}

/// Parse a reports CSV. `planId`, `year`, `quarter` and `actualValue`
/// columns are required; `score` and `reportingUserId` are optional.
/// Rows without a `reportingUserId` cell fall back to
/// `default_reporting_user`.
pub fn parse_reports_csv(
    text: &str,
    known_plans: &BTreeSet<i64>,
    default_reporting_user: Option<i64>,
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    let mut lines = text.lines().enumerate();
    let header = match lines.next() {
        Some((_, line)) if !line.trim().is_empty() => line,
        _ => {
            outcome.errors.push("missing header row".to_string());
            return outcome;
        }
    };
    let header_cells = split_line(header);
    let find = |name: &str| header_cells.iter().position(|c| c.trim() == name);

    let mut required = |name: &str| match find(name) {
        Some(idx) => idx,
        None => {
            outcome
                .errors
                .push(format!("missing required column `{name}`"));
            0
        }
    };
    let columns = Columns {
        plan_id: required("planId"),
        year: required("year"),
        quarter: required("quarter"),
        actual_value: required("actualValue"),
        score: find("score"),
        reporting_user: find("reportingUserId"),
    };
    if !outcome.errors.is_empty() {
        return outcome;
    }

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        // Header is row 1, so a 0-based line index maps to idx + 1.
        let row = idx + 1;
        let fields = split_line(line);
        match parse_row(&fields, &columns, known_plans, default_reporting_user) {
            Ok(report) => outcome.rows.push(ParsedRow { row, report }),
            Err(msg) => outcome.errors.push(format!("row {row}: {msg}")),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::{date, datetime};

    fn plan(id: i64, name: &str) -> Plan {
        Plan {
            id,
            name: name.to_string(),
            description: None,
            target_value: Some(Decimal::new(850005, 1)),
            start_date: Some(date!(2024 - 04 - 01)),
            end_date: None,
            executor_user_ids: [3].into_iter().collect(),
            created_by_user_id: Some(1),
            created_at: None,
        }
    }

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            email: format!("u{id}@corp.io"),
            full_name: Some(name.to_string()),
            user_role: planboard_model::Role::Executor,
        }
    }

    fn report(id: i64, plan_id: i64) -> QuarterlyReport {
        QuarterlyReport {
            id,
            plan_id,
            reporting_user_id: 3,
            assessed_by_user_id: Some(2),
            year: 2024,
            quarter: 2,
            actual_value: Some(Decimal::new(410005, 1)),
            analyst_assessment_score: Some(4),
            created_at: Some(datetime!(2024-07-02 09:00:00)),
        }
    }

    #[test]
    fn text_cells_escape_quotes_and_commas() {
        assert_eq!(text_cell("plain"), "plain");
        assert_eq!(text_cell("a,b"), "\"a,b\"");
        assert_eq!(text_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn formula_prefixes_are_neutralized() {
        assert_eq!(text_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(text_cell("@cmd"), "'@cmd");
        assert_eq!(text_cell("+1"), "'+1");
        assert_eq!(text_cell("-rf"), "'-rf");
    }

    #[test]
    fn plans_export_resolves_names() {
        let csv = plans_to_csv(&[plan(7, "Q2 rollout")], &[user(3, "Eve Executor")]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,description,startDate,endDate,targetValue,executors,createdBy"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,Q2 rollout,"));
        assert!(row.contains("2024-04-01"));
        assert!(row.contains("85000.5"));
        assert!(row.contains("Eve Executor"));
        assert!(row.contains("user 1"), "unknown creator falls back to id");
    }

    #[test]
    fn reports_export_is_reimportable() {
        let plans = vec![plan(7, "Q2 rollout")];
        let users = vec![user(3, "Eve Executor")];
        let csv = reports_to_csv(&[report(11, 7)], &plans, &users);
        assert!(csv.lines().next().unwrap().contains("planId"));
        assert!(csv.contains("41000.5"));

        let known: BTreeSet<i64> = plans.iter().map(|p| p.id).collect();
        let outcome = parse_reports_csv(&csv, &known, None);
        assert!(outcome.errors.is_empty(), "errors: {:?}", outcome.errors);
        assert_eq!(outcome.rows.len(), 1);
        let parsed = &outcome.rows[0].report;
        assert_eq!(parsed.plan_id, 7);
        assert_eq!(parsed.reporting_user_id, 3);
        assert_eq!(parsed.actual_value, Decimal::new(410005, 1));
        assert_eq!(parsed.analyst_assessment_score, Some(4));
    }

    #[test]
    fn quoted_cells_keep_commas_and_escaped_quotes() {
        let fields = split_line("7,\"a, \"\"b\"\"\",2024");
        assert_eq!(fields, vec!["7", "a, \"b\"", "2024"]);
    }

    #[test]
    fn blank_rows_are_skipped_and_errors_name_their_row() {
        let csv = "planId,year,quarter,actualValue\n\
                   7,2024,2,1000\n\
                   \n\
                   99,2024,2,1000\n\
                   7,1999,2,1000\n";
        let known: BTreeSet<i64> = [7].into_iter().collect();
        let outcome = parse_reports_csv(csv, &known, Some(3));
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].row, 2);
        assert_eq!(
            outcome.errors,
            vec![
                "row 4: unknown planId 99".to_string(),
                "row 5: year 1999 out of range 2000-2099".to_string(),
            ]
        );
    }

    #[test]
    fn decimal_comma_is_tolerated() {
        let csv = "planId,year,quarter,actualValue\n7,2024,2,\"41000,5\"\n";
        let known: BTreeSet<i64> = [7].into_iter().collect();
        let outcome = parse_reports_csv(csv, &known, Some(3));
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.rows[0].report.actual_value, Decimal::new(410005, 1));
    }

    #[test]
    fn quarter_and_score_ranges_are_enforced() {
        let csv = "planId,year,quarter,actualValue,score\n\
                   7,2024,5,1000,\n\
                   7,2024,2,1000,6\n\
                   7,2024,2,1000,abc\n";
        let known: BTreeSet<i64> = [7].into_iter().collect();
        let outcome = parse_reports_csv(csv, &known, Some(3));
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.errors[0], "row 2: quarter 5 out of range 1-4");
        assert_eq!(outcome.errors[1], "row 3: score 6 out of range 1-5");
        assert_eq!(outcome.errors[2], "row 4: invalid score `abc`");
    }

    #[test]
    fn missing_reporting_user_needs_a_default() {
        let csv = "planId,year,quarter,actualValue\n7,2024,2,1000\n";
        let known: BTreeSet<i64> = [7].into_iter().collect();

        let without = parse_reports_csv(csv, &known, None);
        assert_eq!(without.errors, vec!["row 2: missing reportingUserId"]);

        let with_column =
            "planId,year,quarter,actualValue,reportingUserId\n7,2024,2,1000,5\n";
        let outcome = parse_reports_csv(with_column, &known, None);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.rows[0].report.reporting_user_id, 5);
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let csv = "planId,year,actualValue\n7,2024,1000\n";
        let outcome = parse_reports_csv(csv, &BTreeSet::new(), None);
        assert_eq!(outcome.errors, vec!["missing required column `quarter`"]);
        assert!(outcome.rows.is_empty());
    }
}
