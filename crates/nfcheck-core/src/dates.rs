//! Parsing of planning periods and receipt dates into comparable
//! [`YearMonth`] values.
//!
//! Month names are resolved through an injected [`MonthNames`] table rather
//! than any process-wide locale.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

/// Where the year sits in a receipt-date format.
#[derive(Debug, Clone, Copy)]
enum YearAt {
  Start,
  End,
}

/// Receipt-date formats with their separator, tried in order. `MM-DD-YYYY`
/// is never tried: `01-02-2025` must always read as 1 February.
const RECEIPT_FORMATS: [(&str, char, YearAt); 3] = [
  ("%Y-%m-%d", '-', YearAt::Start),
  ("%d/%m/%Y", '/', YearAt::End),
  ("%d-%m-%Y", '-', YearAt::End),
];

const PORTUGUESE_MONTHS: [(&str, u32); 12] = [
  ("janeiro", 1),
  ("fevereiro", 2),
  ("março", 3),
  ("abril", 4),
  ("maio", 5),
  ("junho", 6),
  ("julho", 7),
  ("agosto", 8),
  ("setembro", 9),
  ("outubro", 10),
  ("novembro", 11),
  ("dezembro", 12),
];

// ─── YearMonth ───────────────────────────────────────────────────────────────

/// A calendar month. Ordering is by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
  pub year:  i32,
  pub month: u32,
}

impl YearMonth {
  pub const fn new(year: i32, month: u32) -> Self { Self { year, month } }
}

impl std::fmt::Display for YearMonth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

// ─── MonthNames ──────────────────────────────────────────────────────────────

/// Case-insensitive mapping from month name to month number (1–12).
#[derive(Debug, Clone)]
pub struct MonthNames {
  by_name: HashMap<String, u32>,
}

impl MonthNames {
  /// Build a table from `(name, number)` pairs. Names are lower-cased;
  /// numbers outside 1–12 never resolve.
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = (S, u32)>,
    S: AsRef<str>,
  {
    let by_name = names
      .into_iter()
      .filter(|(_, n)| (1..=12).contains(n))
      .map(|(name, n)| (name.as_ref().trim().to_lowercase(), n))
      .collect();
    Self { by_name }
  }

  /// Full Portuguese month names, `janeiro` through `dezembro`.
  pub fn portuguese() -> Self { Self::new(PORTUGUESE_MONTHS) }

  pub fn resolve(&self, name: &str) -> Option<u32> {
    self.by_name.get(&name.trim().to_lowercase()).copied()
  }
}

impl Default for MonthNames {
  fn default() -> Self { Self::portuguese() }
}

// ─── DateNormalizer ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct DateNormalizer {
  months: MonthNames,
}

impl DateNormalizer {
  pub fn new(months: MonthNames) -> Self { Self { months } }

  /// Parse `"<year>/<month name>"`, e.g. `"2025/maio"`.
  ///
  /// Fails with [`Error::InvalidPlanningFormat`] unless the text splits on
  /// `/` into exactly two segments, the first an integer year and the second
  /// a month name known to the injected table.
  pub fn parse_planning_period(&self, text: &str) -> Result<YearMonth> {
    let invalid = || Error::InvalidPlanningFormat(text.to_owned());

    let mut segments = text.split('/');
    let (Some(year), Some(month), None) =
      (segments.next(), segments.next(), segments.next())
    else {
      return Err(invalid());
    };

    let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
    let month = self.months.resolve(month).ok_or_else(invalid)?;
    Ok(YearMonth::new(year, month))
  }

  /// Parse a receipt date as `YYYY-MM-DD`, then `DD/MM/YYYY`, then
  /// `DD-MM-YYYY`; the first format that parses wins.
  ///
  /// The year must be written with exactly four digits, so `15/05/25` and
  /// `15-05-25` are rejected rather than read as years 25 or 15.
  pub fn parse_receipt_date(&self, text: &str) -> Result<YearMonth> {
    let trimmed = text.trim();
    RECEIPT_FORMATS
      .iter()
      .filter(|(_, sep, at)| has_four_digit_year(trimmed, *sep, *at))
      .find_map(|(fmt, _, _)| NaiveDate::parse_from_str(trimmed, fmt).ok())
      .map(|d| YearMonth::new(d.year(), d.month()))
      .ok_or_else(|| Error::InvalidDateFormat(text.to_owned()))
  }
}

fn has_four_digit_year(text: &str, sep: char, at: YearAt) -> bool {
  let year = match at {
    YearAt::Start => text.split(sep).next(),
    YearAt::End => text.rsplit(sep).next(),
  };
  year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}
