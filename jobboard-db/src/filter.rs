//! Translation of listing parameters into a `WHERE` predicate over `jobs`.
//!
//! A [`Predicate`] is an opaque condition tree. It only references columns
//! through [`Column`], and every user supplied value is bound as a query
//! parameter, so rendering it into a [`QueryBuilder`] is injection free.

use sqlx::QueryBuilder;

use crate::DbBackend;

/// Columns a predicate may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    JobTitle,
    CompanyName,
    Location,
    JobType,
    SalaryFrom,
    SalaryTo,
    JobDescription,
}

impl Column {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Column::JobTitle => "job_title",
            Column::CompanyName => "company_name",
            Column::Location => "location",
            Column::JobType => "job_type",
            Column::SalaryFrom => "salary_from",
            Column::SalaryTo => "salary_to",
            Column::JobDescription => "job_description",
        }
    }

    /// Expression holding the lowercased value of the column. The free-text
    /// columns keep a copy folded with full Unicode case mapping at insert.
    pub const fn folded_sql(self) -> &'static str {
        match self {
            Column::JobTitle => "job_title_folded",
            Column::CompanyName => "company_name_folded",
            Column::Location => "location_folded",
            Column::JobDescription => "job_description_folded",
            Column::JobType => "LOWER(job_type)",
            Column::SalaryFrom => "LOWER(salary_from)",
            Column::SalaryTo => "LOWER(salary_to)",
        }
    }
}

/// Lowercase `text` the way the `*_folded` columns are written.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gte,
    Lte,
}

impl CompareOp {
    const fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Gte => " >= ",
            CompareOp::Lte => " <= ",
        }
    }
}

/// How salary bounds, which are stored as text, are compared against the
/// requested range.
///
/// `Text` compares the decimal rendering of the bound with the stored
/// string byte by byte, so `"9"` sorts above `"10"` and `"20"` satisfies
/// `>= 100`. Existing clients depend on that ordering, so it stays the
/// default. `Numeric` reads the leading integer of the stored value and
/// ignores rows whose salary does not start with one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SalaryComparison {
    #[default]
    Text,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every row.
    All,
    /// Case-insensitive substring match.
    Contains { column: Column, needle: String },
    Equals { column: Column, value: String },
    TextCompare {
        column: Column,
        op: CompareOp,
        value: String,
    },
    IntCompare {
        column: Column,
        op: CompareOp,
        value: i64,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

#[cfg(feature = "sqlite")]
fn push_leading_int(qb: &mut QueryBuilder<'_, DbBackend>, column: Column) {
    let col = column.as_sql();
    qb.push(format!(
        "(CASE WHEN LTRIM({col}) GLOB '[0-9]*' OR LTRIM({col}) GLOB '-[0-9]*' \
         THEN CAST({col} AS INTEGER) END)"
    ));
}

#[cfg(feature = "postgres")]
fn push_leading_int(qb: &mut QueryBuilder<'_, DbBackend>, column: Column) {
    let col = column.as_sql();
    qb.push(format!(
        "(CASE WHEN {col} ~ '^\\s*-?[0-9]' \
         THEN CAST(substring({col} from '^\\s*(-?[0-9]{{1,18}})') AS BIGINT) END)"
    ));
}

impl Predicate {
    /// Conjunction that collapses trivially: no parts is [`Predicate::All`],
    /// one part is that part.
    pub fn and(mut parts: Vec<Predicate>) -> Predicate {
        parts.retain(|p| !matches!(p, Predicate::All));
        match parts.len() {
            0 => Predicate::All,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// The legacy free-text search: the query appears, ignoring case, in
    /// the title, company, location or description.
    pub fn text_search(query: &str) -> Predicate {
        Predicate::Or(
            [
                Column::JobTitle,
                Column::CompanyName,
                Column::Location,
                Column::JobDescription,
            ]
            .into_iter()
            .map(|column| Predicate::Contains {
                column,
                needle: query.to_owned(),
            })
            .collect(),
        )
    }

    /// Append this predicate as SQL to `qb`, binding every value.
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, DbBackend>) {
        match self {
            Predicate::All => {
                qb.push("1 = 1");
            }
            Predicate::Contains { column, needle } => {
                qb.push(column.folded_sql());
                qb.push(" LIKE ");
                qb.push_bind(like_pattern(&fold_case(needle)));
                qb.push(" ESCAPE '\\'");
            }
            Predicate::Equals { column, value } => {
                qb.push(column.as_sql());
                qb.push(" = ");
                qb.push_bind(value.clone());
            }
            Predicate::TextCompare { column, op, value } => {
                qb.push(column.as_sql());
                qb.push(op.as_sql());
                qb.push_bind(value.clone());
            }
            Predicate::IntCompare { column, op, value } => {
                push_leading_int(qb, *column);
                qb.push(op.as_sql());
                qb.push_bind(*value);
            }
            Predicate::And(parts) => push_joined(qb, parts, " AND "),
            Predicate::Or(parts) => push_joined(qb, parts, " OR "),
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, DbBackend>, parts: &[Predicate], sep: &str) {
    if parts.is_empty() {
        // empty OR matches nothing, empty AND matches everything
        qb.push(if sep == " OR " { "1 = 0" } else { "1 = 1" });
        return;
    }
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        part.push_to(qb);
    }
    qb.push(")");
}

/// Wrap `needle` in `%` wildcards after escaping LIKE metacharacters so it
/// matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Parse the leading integer of `raw`: optional surrounding whitespace, an
/// optional sign, then a run of ASCII digits. Anything after the digits is
/// ignored (`"15k"` is 15). Returns `None` when there are no digits or the
/// value does not fit an `i64`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Optional listing filters as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

impl JobFilter {
    /// Build the combined predicate. Blank text parameters and
    /// non-numeric salary bounds impose no constraint.
    pub fn to_predicate(&self, mode: SalaryComparison) -> Predicate {
        let mut parts = Vec::new();

        if let Some(title) = non_blank(&self.job_title) {
            parts.push(Predicate::Contains {
                column: Column::JobTitle,
                needle: title.to_owned(),
            });
        }
        if let Some(location) = non_blank(&self.location) {
            parts.push(Predicate::Contains {
                column: Column::Location,
                needle: location.to_owned(),
            });
        }
        if let Some(job_type) = non_blank(&self.job_type) {
            parts.push(Predicate::Equals {
                column: Column::JobType,
                value: job_type.to_owned(),
            });
        }

        let min = self.min_salary.as_deref().and_then(parse_leading_int);
        let max = self.max_salary.as_deref().and_then(parse_leading_int);
        if let Some(min) = min {
            parts.push(salary_bound(CompareOp::Gte, min, mode));
        }
        if let Some(max) = max {
            parts.push(salary_bound(CompareOp::Lte, max, mode));
        }

        Predicate::and(parts)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Either salary column satisfies the bound.
fn salary_bound(op: CompareOp, bound: i64, mode: SalaryComparison) -> Predicate {
    let side = |column| match mode {
        SalaryComparison::Text => Predicate::TextCompare {
            column,
            op,
            value: bound.to_string(),
        },
        SalaryComparison::Numeric => Predicate::IntCompare {
            column,
            op,
            value: bound,
        },
    };
    Predicate::Or(vec![side(Column::SalaryFrom), side(Column::SalaryTo)])
}
