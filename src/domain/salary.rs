//! Salary ranges, currency normalization and annualized bucketing.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
    Project,
}

impl SalaryUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            SalaryUnit::Hour => "hour",
            SalaryUnit::Day => "day",
            SalaryUnit::Week => "week",
            SalaryUnit::Month => "month",
            SalaryUnit::Year => "year",
            SalaryUnit::Project => "project",
        }
    }

    /// Multiplier that turns one unit of pay into a yearly figure.
    pub fn annual_multiplier(self) -> f64 {
        match self {
            SalaryUnit::Hour => 2080.0,
            SalaryUnit::Day => 260.0,
            SalaryUnit::Week => 52.0,
            SalaryUnit::Month => 12.0,
            SalaryUnit::Year | SalaryUnit::Project => 1.0,
        }
    }

    /// schema.org `unitText` value.
    pub fn schema_unit_text(self) -> &'static str {
        match self {
            SalaryUnit::Hour => "HOUR",
            SalaryUnit::Day => "DAY",
            SalaryUnit::Week => "WEEK",
            SalaryUnit::Month => "MONTH",
            SalaryUnit::Year | SalaryUnit::Project => "YEAR",
        }
    }

    /// Unknown or missing units are read as yearly pay.
    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("hour" | "hourly") => SalaryUnit::Hour,
            Some("day" | "daily") => SalaryUnit::Day,
            Some("week" | "weekly") => SalaryUnit::Week,
            Some("month" | "monthly") => SalaryUnit::Month,
            Some("project") => SalaryUnit::Project,
            _ => SalaryUnit::Year,
        }
    }
}

/// `(code, name, symbol)` triples for the currencies the board knows how to display.
const CURRENCIES: &[(&str, &str, &str)] = &[
    ("USD", "United States Dollar", "$"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("CAD", "Canadian Dollar", "CA$"),
    ("AUD", "Australian Dollar", "A$"),
    ("NZD", "New Zealand Dollar", "NZ$"),
    ("CHF", "Swiss Franc", "CHF "),
    ("JPY", "Japanese Yen", "¥"),
    ("CNY", "Chinese Yuan", "CN¥"),
    ("INR", "Indian Rupee", "₹"),
    ("SGD", "Singapore Dollar", "S$"),
    ("SEK", "Swedish Krona", "kr "),
    ("NOK", "Norwegian Krone", "kr "),
    ("DKK", "Danish Krone", "kr "),
    ("PLN", "Polish Zloty", "zł "),
    ("BRL", "Brazilian Real", "R$"),
    ("MXN", "Mexican Peso", "MX$"),
    ("ZAR", "South African Rand", "R "),
    ("BTC", "Bitcoin", "₿"),
    ("ETH", "Ethereum", "Ξ"),
];

pub const DEFAULT_CURRENCY: &str = "USD";

/// Normalize `"USD (United States Dollar)"`, `"usd"` or `"Euro"` into an ISO-style code.
///
/// Unrecognized values fall back to USD.
pub fn normalize_currency(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return DEFAULT_CURRENCY.to_string();
    };

    let head = raw.split_once('(').map_or(raw, |(head, _)| head).trim();
    CURRENCIES
        .iter()
        .find(|(code, name, _)| code.eq_ignore_ascii_case(head) || name.eq_ignore_ascii_case(raw))
        .map(|(code, _, _)| (*code).to_string())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

pub fn currency_symbol(code: &str) -> String {
    CURRENCIES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, _, symbol)| (*symbol).to_string())
        .unwrap_or_else(|| format!("{code} "))
}

/// Salary range as published by the source; at least one bound is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
    pub unit: SalaryUnit,
}

impl Salary {
    /// Build a salary, returning `None` when neither bound is populated.
    pub fn new(
        min: Option<f64>,
        max: Option<f64>,
        currency: String,
        unit: SalaryUnit,
    ) -> Option<Self> {
        let min = min.filter(|value| value.is_finite() && *value > 0.0);
        let max = max.filter(|value| value.is_finite() && *value > 0.0);
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self {
            min,
            max,
            currency,
            unit,
        })
    }

    /// Yearly figure used for bucketing: the minimum when it is the only bound, else the maximum.
    pub fn annualized(&self) -> Option<f64> {
        let base = match (self.min, self.max) {
            (Some(min), None) => min,
            (_, Some(max)) => max,
            (None, None) => return None,
        };
        Some(base * self.unit.annual_multiplier())
    }

    pub fn bucket(&self) -> Option<SalaryBucket> {
        self.annualized().map(SalaryBucket::for_annual)
    }
}

/// Fixed annualized ranges offered by the salary facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalaryBucket {
    Under50k,
    From50kTo100k,
    From100kTo200k,
    Over200k,
}

impl SalaryBucket {
    pub const ALL: [SalaryBucket; 4] = [
        SalaryBucket::Under50k,
        SalaryBucket::From50kTo100k,
        SalaryBucket::From100kTo200k,
        SalaryBucket::Over200k,
    ];

    /// `< 50k` is strict, `50k-100k` includes both ends, `100k-200k` excludes its lower end.
    pub fn for_annual(annual: f64) -> Self {
        if annual < 50_000.0 {
            SalaryBucket::Under50k
        } else if annual <= 100_000.0 {
            SalaryBucket::From50kTo100k
        } else if annual <= 200_000.0 {
            SalaryBucket::From100kTo200k
        } else {
            SalaryBucket::Over200k
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SalaryBucket::Under50k => "lt-50k",
            SalaryBucket::From50kTo100k => "50k-100k",
            SalaryBucket::From100kTo200k => "100k-200k",
            SalaryBucket::Over200k => "gt-200k",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SalaryBucket::Under50k => "< $50K",
            SalaryBucket::From50kTo100k => "$50K - $100K",
            SalaryBucket::From100kTo200k => "$100K - $200K",
            SalaryBucket::Over200k => "> $200K",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        SalaryBucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == trimmed || bucket.label() == trimmed)
    }
}

fn format_amount(symbol: &str, value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{symbol}{}M", trim_decimal(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{symbol}{}k", trim_decimal(value / 1_000.0))
    } else {
        format!("{symbol}{}", trim_decimal(value))
    }
}

fn trim_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Human readable range such as `$50k-$80k/year`.
pub fn format_salary(salary: Option<&Salary>, show_currency: bool) -> String {
    let Some(salary) = salary else {
        return "Not specified".to_string();
    };

    let symbol = currency_symbol(&salary.currency);
    let mut out = match (salary.min, salary.max) {
        (Some(min), Some(max)) if (min - max).abs() < f64::EPSILON => format_amount(&symbol, min),
        (Some(min), Some(max)) => {
            format!("{}-{}", format_amount(&symbol, min), format_amount(&symbol, max))
        }
        (Some(min), None) => format!("{}+", format_amount(&symbol, min)),
        (None, Some(max)) => format!("Up to {}", format_amount(&symbol, max)),
        (None, None) => return "Not specified".to_string(),
    };

    let _ = write!(out, "/{}", salary.unit.as_str());
    if show_currency {
        let _ = write!(out, " ({})", salary.currency);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(min: Option<f64>, max: Option<f64>, unit: SalaryUnit) -> Salary {
        Salary::new(min, max, "USD".to_string(), unit).expect("salary present")
    }

    #[test]
    fn absent_bounds_produce_no_salary() {
        assert!(Salary::new(None, None, "USD".into(), SalaryUnit::Year).is_none());
        assert!(Salary::new(Some(0.0), None, "USD".into(), SalaryUnit::Year).is_none());
    }

    #[test]
    fn annualization_prefers_maximum_unless_only_minimum() {
        assert_eq!(
            salary(Some(40.0), None, SalaryUnit::Hour).annualized(),
            Some(83_200.0)
        );
        assert_eq!(
            salary(Some(40.0), Some(60.0), SalaryUnit::Hour).annualized(),
            Some(124_800.0)
        );
        assert_eq!(
            salary(None, Some(5_000.0), SalaryUnit::Month).annualized(),
            Some(60_000.0)
        );
    }

    #[test]
    fn annualization_scales_linearly_with_rate() {
        for rate in [10.0_f64, 25.5, 80.0] {
            let single = salary(Some(rate), None, SalaryUnit::Hour)
                .annualized()
                .expect("annual");
            let doubled = salary(Some(rate * 2.0), None, SalaryUnit::Hour)
                .annualized()
                .expect("annual");
            assert!((doubled - single * 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn bucket_boundaries_are_asymmetric() {
        assert_eq!(SalaryBucket::for_annual(49_999.0), SalaryBucket::Under50k);
        assert_eq!(SalaryBucket::for_annual(50_000.0), SalaryBucket::From50kTo100k);
        assert_eq!(SalaryBucket::for_annual(100_000.0), SalaryBucket::From50kTo100k);
        assert_eq!(SalaryBucket::for_annual(100_001.0), SalaryBucket::From100kTo200k);
        assert_eq!(SalaryBucket::for_annual(200_000.0), SalaryBucket::From100kTo200k);
        assert_eq!(SalaryBucket::for_annual(200_001.0), SalaryBucket::Over200k);
    }

    #[test]
    fn currency_accepts_codes_names_and_labels() {
        assert_eq!(normalize_currency(Some("EUR (Euro)")), "EUR");
        assert_eq!(normalize_currency(Some("gbp")), "GBP");
        assert_eq!(normalize_currency(Some("Swiss Franc")), "CHF");
        assert_eq!(normalize_currency(Some("Doubloons")), "USD");
        assert_eq!(normalize_currency(None), "USD");
    }

    #[test]
    fn salary_formatting_scales_amounts() {
        let yearly = salary(Some(50_000.0), Some(80_000.0), SalaryUnit::Year);
        assert_eq!(format_salary(Some(&yearly), false), "$50k-$80k/year");
        assert_eq!(format_salary(Some(&yearly), true), "$50k-$80k/year (USD)");

        let hourly = Salary::new(Some(45.0), None, "EUR".into(), SalaryUnit::Hour)
            .expect("salary present");
        assert_eq!(format_salary(Some(&hourly), false), "€45+/hour");

        let big = salary(None, Some(1_500_000.0), SalaryUnit::Year);
        assert_eq!(format_salary(Some(&big), false), "Up to $1.5M/year");

        assert_eq!(format_salary(None, true), "Not specified");
    }
}
