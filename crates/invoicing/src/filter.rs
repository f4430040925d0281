//! Month / year filtering of invoices by pick-up date.

use core::str::FromStr;

use chrono::{Datelike, NaiveDate};

use laundrydesk_core::DomainError;

use crate::invoice::InvoiceEntry;

/// Month axis of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// 1 = January.
    Month(u32),
}

/// Year axis of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl FromStr for MonthFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        match s.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => Ok(MonthFilter::Month(m)),
            _ => Err(DomainError::validation("month must be 'all' or 1-12")),
        }
    }
}

impl FromStr for YearFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        s.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| DomainError::validation("year must be 'all' or a four-digit year"))
    }
}

/// Month/year filter over `pickup_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceFilter {
    pub month: MonthFilter,
    pub year: YearFilter,
}

impl InvoiceFilter {
    pub fn new(month: MonthFilter, year: YearFilter) -> Self {
        Self { month, year }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month == MonthFilter::All && self.year == YearFilter::All
    }

    /// Whether `invoice` passes. A pick-up date that is not a calendar date
    /// only passes the unfiltered filter.
    pub fn matches(&self, invoice: &InvoiceEntry) -> bool {
        if self.is_unfiltered() {
            return true;
        }
        let Ok(date) = NaiveDate::parse_from_str(&invoice.pickup_date, "%Y-%m-%d") else {
            return false;
        };

        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Month(m) => date.month() == m,
        };
        let year_ok = match self.year {
            YearFilter::All => true,
            YearFilter::Year(y) => date.year() == y,
        };
        month_ok && year_ok
    }

    pub fn apply(&self, invoices: &[InvoiceEntry]) -> Vec<InvoiceEntry> {
        invoices.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Year picker choices: "all", then five years back through next year.
pub fn year_options(current_year: i32) -> Vec<String> {
    let mut years = vec!["all".to_string()];
    years.extend((current_year - 5..=current_year + 1).map(|y| y.to_string()));
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(date: &str) -> InvoiceEntry {
        InvoiceEntry {
            invoice_no: format!("INV-{}-001", date.replace('-', "")),
            pickup_date: date.to_string(),
            return_date: None,
            total_price: 1000,
            log_entry_ids: vec![],
        }
    }

    fn sample() -> Vec<InvoiceEntry> {
        vec![
            invoice("2023-12-30"),
            invoice("2024-01-05"),
            invoice("2024-02-10"),
            invoice("not-a-date"),
        ]
    }

    #[test]
    fn all_all_returns_everything() {
        let invoices = sample();
        assert_eq!(InvoiceFilter::default().apply(&invoices), invoices);
    }

    #[test]
    fn month_and_year_are_independent_axes() {
        let invoices = sample();

        let jan = InvoiceFilter::new(MonthFilter::Month(1), YearFilter::All).apply(&invoices);
        assert_eq!(jan.len(), 1);
        assert_eq!(jan[0].pickup_date, "2024-01-05");

        let y2024 = InvoiceFilter::new(MonthFilter::All, YearFilter::Year(2024)).apply(&invoices);
        assert_eq!(y2024.len(), 2);

        let dec_2024 =
            InvoiceFilter::new(MonthFilter::Month(12), YearFilter::Year(2024)).apply(&invoices);
        assert!(dec_2024.is_empty());
    }

    #[test]
    fn malformed_dates_fail_closed() {
        let invoices = sample();
        let filtered = InvoiceFilter::new(MonthFilter::All, YearFilter::Year(2024)).apply(&invoices);
        assert!(filtered.iter().all(|i| i.pickup_date != "not-a-date"));
    }

    #[test]
    fn parses_query_values() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("3".parse::<MonthFilter>().unwrap(), MonthFilter::Month(3));
        assert!("13".parse::<MonthFilter>().is_err());
        assert!("0".parse::<MonthFilter>().is_err());
        assert_eq!("".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!("2024".parse::<YearFilter>().unwrap(), YearFilter::Year(2024));
        assert!("twenty".parse::<YearFilter>().is_err());
    }

    #[test]
    fn year_options_span_five_back_one_ahead() {
        let years = year_options(2026);
        assert_eq!(years.first().map(String::as_str), Some("all"));
        assert_eq!(years[1], "2021");
        assert_eq!(years.last().map(String::as_str), Some("2027"));
        assert_eq!(years.len(), 8);
    }
}
