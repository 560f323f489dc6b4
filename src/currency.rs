//! Static-rate currency conversion and display formatting.
//!
//! Amounts are computed in USD everywhere else; conversion happens only at
//! the presentation boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Amounts below this many USD are shown in exponential notation.
pub const SMALL_AMOUNT_THRESHOLD_USD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub symbol: String,
    pub name: String,
    pub code: String,
    /// Multiplier from USD.
    pub rate: f64,
    pub position: SymbolPosition,
    pub decimal_places: usize,
}

impl Currency {
    pub fn usd() -> Self {
        Currency {
            symbol: "$".to_string(),
            name: "US Dollar".to_string(),
            code: "USD".to_string(),
            rate: 1.0,
            position: SymbolPosition::Before,
            decimal_places: 2,
        }
    }

    fn place_symbol(&self, number: &str) -> String {
        match self.position {
            SymbolPosition::Before => format!("{}{}", self.symbol, number),
            SymbolPosition::After => format!("{}{}", number, self.symbol),
        }
    }
}

/// Currencies keyed by code. Always contains `USD`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    currencies: BTreeMap<String, Currency>,
}

impl CurrencyTable {
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Result<Self> {
        let currencies: BTreeMap<String, Currency> = currencies
            .into_iter()
            .map(|c| (c.code.clone(), c))
            .collect();
        if !currencies.contains_key("USD") {
            return Err(Error::InvalidData {
                kind: "currency",
                reason: "table has no USD entry".to_string(),
            });
        }
        Ok(CurrencyTable { currencies })
    }

    /// Exact lookup by code, falling back to USD.
    pub fn get(&self, code: &str) -> &Currency {
        get_currency(code, self)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.currencies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        let mut currencies = BTreeMap::new();
        currencies.insert("USD".to_string(), Currency::usd());
        CurrencyTable { currencies }
    }
}

pub fn get_currency<'a>(code: &str, table: &'a CurrencyTable) -> &'a Currency {
    match table.currencies.get(code) {
        Some(currency) => currency,
        None => &table.currencies["USD"],
    }
}

pub fn convert_currency(amount_usd: f64, currency: &Currency) -> f64 {
    amount_usd * currency.rate
}

/// Round to the currency's decimal places, group thousands with `,`, and
/// attach the symbol.
pub fn format_currency(amount: f64, currency: &Currency) -> String {
    currency.place_symbol(&group_thousands(amount, currency.decimal_places))
}

/// `format_currency` followed by the ISO code, e.g. `"$1,234.56 USD"`.
pub fn format_currency_with_code(amount: f64, currency: &Currency) -> String {
    format!("{} {}", format_currency(amount, currency), currency.code)
}

/// Like [`format_currency`] but takes USD and keeps sub-cent amounts
/// readable. The threshold is checked before conversion so the switch to
/// exponential notation does not depend on the target currency.
pub fn format_small_currency(amount_usd: f64, currency: &Currency) -> String {
    let converted = convert_currency(amount_usd, currency);
    if amount_usd < SMALL_AMOUNT_THRESHOLD_USD {
        currency.place_symbol(&to_exponential(converted, 2))
    } else {
        format_currency(converted, currency)
    }
}

fn group_thousands(amount: f64, decimal_places: usize) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.*}", decimal_places, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    // "-0.00" reads as noise; only keep the sign for nonzero output
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if amount < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Exponential notation with an explicit exponent sign (`1.50e-5`, `1.35e+0`).
fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let formatted = format!("{:.*e}", fraction_digits, value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur() -> Currency {
        Currency {
            symbol: "€".to_string(),
            name: "Euro".to_string(),
            code: "EUR".to_string(),
            rate: 0.92,
            position: SymbolPosition::Before,
            decimal_places: 2,
        }
    }

    fn sek() -> Currency {
        Currency {
            symbol: " kr".to_string(),
            name: "Swedish Krona".to_string(),
            code: "SEK".to_string(),
            rate: 10.0,
            position: SymbolPosition::After,
            decimal_places: 2,
        }
    }

    fn jpy() -> Currency {
        Currency {
            symbol: "¥".to_string(),
            name: "Japanese Yen".to_string(),
            code: "JPY".to_string(),
            rate: 150.0,
            position: SymbolPosition::Before,
            decimal_places: 0,
        }
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert_currency(100.0, &Currency::usd()), 100.0);
        assert_eq!(convert_currency(100.0, &jpy()), 15000.0);
    }

    #[test]
    fn test_format_groups_and_places_symbol() {
        assert_eq!(format_currency(1234.567, &Currency::usd()), "$1,234.57");
        assert_eq!(format_currency(1234567.0, &Currency::usd()), "$1,234,567.00");
        assert_eq!(format_currency(12.0, &Currency::usd()), "$12.00");
        assert_eq!(format_currency(0.0, &Currency::usd()), "$0.00");
        assert_eq!(format_currency(15000.0, &jpy()), "¥15,000");
        assert_eq!(format_currency(100.0, &sek()), "100.00 kr");
        assert_eq!(format_currency(-2500.0, &Currency::usd()), "$-2,500.00");
        assert_eq!(format_currency(-0.001, &Currency::usd()), "$0.00");
    }

    #[test]
    fn test_format_with_code() {
        assert_eq!(format_currency_with_code(1234.56, &Currency::usd()), "$1,234.56 USD");
    }

    #[test]
    fn test_small_amounts_use_exponential() {
        assert_eq!(format_small_currency(0.000015, &Currency::usd()), "$1.50e-5");
        assert_eq!(format_small_currency(0.5, &Currency::usd()), "$0.50");
    }

    #[test]
    fn test_small_threshold_is_checked_in_usd() {
        // 0.009 USD is 1.35 JPY, still exponential because USD < 0.01
        assert_eq!(format_small_currency(0.009, &jpy()), "¥1.35e+0");
        // 0.02 USD converts to 0.0184 EUR, but USD >= 0.01 so normal formatting
        assert_eq!(format_small_currency(0.02, &eur()), "€0.02");
    }

    #[test]
    fn test_lookup_falls_back_to_usd() {
        let table = CurrencyTable::new([Currency::usd(), eur()]).unwrap();
        assert_eq!(get_currency("XYZ", &table), get_currency("USD", &table));
        assert_eq!(table.get("EUR").code, "EUR");
    }

    #[test]
    fn test_table_requires_usd() {
        assert!(CurrencyTable::new([eur()]).is_err());
    }
}
