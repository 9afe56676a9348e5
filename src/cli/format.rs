use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Config;

/// Money rendering rules derived from the configured currency and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    symbol: String,
    precision: u32,
    decimal_separator: char,
    grouping_separator: char,
}

impl MoneyFormat {
    pub fn new(currency: &str, locale: &str) -> Self {
        let (decimal_separator, grouping_separator) = separators_for(locale);
        Self {
            symbol: symbol_for(currency),
            precision: minor_units_for(currency),
            decimal_separator,
            grouping_separator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    /// `-$1,234.50` style rendering; the sign precedes the symbol.
    pub fn format(&self, amount: Decimal) -> String {
        let mut value = amount
            .abs()
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(self.precision);
        let raw = value.to_string();
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (raw.as_str(), None),
        };

        let mut body = group_digits(int_part, self.grouping_separator);
        if let Some(frac) = frac_part {
            body.push(self.decimal_separator);
            body.push_str(frac);
        }
        let sign = if amount < Decimal::ZERO && !value.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{body}", self.symbol)
    }

    /// Like [`format`](Self::format) with an explicit `+` on positive amounts.
    pub fn format_signed(&self, amount: Decimal) -> String {
        if amount > Decimal::ZERO {
            format!("+{}", self.format(amount))
        } else {
            self.format(amount)
        }
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "BRL" => "R$".into(),
        "AUD" => "A$".into(),
        other => format!("{other} "),
    }
}

fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

fn separators_for(locale: &str) -> (char, char) {
    let language = locale
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "pt" | "es" | "it" | "nl" => (',', '.'),
        "fr" => (',', ' '),
        _ => ('.', ','),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn formats_usd_like_the_dashboard() {
        let fmt = MoneyFormat::default();
        assert_eq!(fmt.format(dec("3518.56")), "$3,518.56");
        assert_eq!(fmt.format(dec("-1200")), "-$1,200.00");
        assert_eq!(fmt.format(dec("0.005")), "$0.01");
        assert_eq!(fmt.format(dec("-0.001")), "$0.00");
        assert_eq!(fmt.format_signed(dec("850")), "+$850.00");
        assert_eq!(fmt.format(dec("1234567.8")), "$1,234,567.80");
    }

    #[test]
    fn locale_changes_separators() {
        let fmt = MoneyFormat::new("EUR", "de-DE");
        assert_eq!(fmt.format(dec("-1581.44")), "-€1.581,44");
        let yen = MoneyFormat::new("JPY", "ja-JP");
        assert_eq!(yen.format(dec("5200.4")), "¥5,200");
        let other = MoneyFormat::new("CHF", "en-US");
        assert_eq!(other.format(dec("12")), "CHF 12.00");
    }
}
