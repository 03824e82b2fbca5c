//! Accident Record Module
//! Typed rows before and after cleaning, plus the categorical domains.

use std::fmt;

/// Sentinel used for missing country/region and operator values.
pub const UNKNOWN: &str = "Unknown";

/// Quarter of the year, in natural order. `Missing` covers anything outside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Qtr1,
    Qtr2,
    Qtr3,
    Qtr4,
    Missing,
}

impl Quarter {
    pub const DOMAIN: [Quarter; 4] = [Quarter::Qtr1, Quarter::Qtr2, Quarter::Qtr3, Quarter::Qtr4];

    /// Exact-match parse; unrecognized or absent values become `Missing`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Qtr 1") => Quarter::Qtr1,
            Some("Qtr 2") => Quarter::Qtr2,
            Some("Qtr 3") => Quarter::Qtr3,
            Some("Qtr 4") => Quarter::Qtr4,
            _ => Quarter::Missing,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Quarter::Qtr1 => Some("Qtr 1"),
            Quarter::Qtr2 => Some("Qtr 2"),
            Quarter::Qtr3 => Some("Qtr 3"),
            Quarter::Qtr4 => Some("Qtr 4"),
            Quarter::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Quarter::Missing)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("(missing)"))
    }
}

/// Calendar month. `Missing` covers anything outside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
    Missing,
}

impl Month {
    pub const DOMAIN: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| Self::DOMAIN.into_iter().find(|m| m.label() == Some(s)))
            .unwrap_or(Month::Missing)
    }

    pub fn label(&self) -> Option<&'static str> {
        let name = match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
            Month::Missing => return None,
        };
        Some(name)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Month::Missing)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("(missing)"))
    }
}

/// One row as read from the source file, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub country_region: Option<String>,
    pub operator: Option<String>,
    pub aircraft_manufacturer: Option<String>,
    pub aircraft: Option<String>,
    pub location: Option<String>,
    pub quarter: Option<String>,
    pub month: Option<String>,
    pub year: i32,
    pub ground: Option<f64>,
    pub fatalities_air: Option<f64>,
    pub aboard: Option<f64>,
}

/// One row of the canonical table.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    pub country_region: String,
    pub operator: String,
    pub aircraft_manufacturer: Option<String>,
    pub aircraft: Option<String>,
    pub location: Option<String>,
    pub quarter: Quarter,
    pub month: Month,
    pub year: i32,
    pub ground: Option<f64>,
    pub fatalities_air: Option<f64>,
    pub aboard: Option<f64>,
}

/// Hashable identity of a record; floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    text: [Option<String>; 5],
    quarter: Quarter,
    month: Month,
    year: i32,
    numbers: [Option<u64>; 3],
}

impl AccidentRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            text: [
                Some(self.country_region.clone()),
                Some(self.operator.clone()),
                self.aircraft_manufacturer.clone(),
                self.aircraft.clone(),
                self.location.clone(),
            ],
            quarter: self.quarter,
            month: self.month,
            year: self.year,
            numbers: [
                self.ground.map(f64::to_bits),
                self.fatalities_air.map(f64::to_bits),
                self.aboard.map(f64::to_bits),
            ],
        }
    }

    /// Turn a cleaned row back into its raw form so it can be fed through the pipeline again.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            country_region: Some(self.country_region.clone()),
            operator: Some(self.operator.clone()),
            aircraft_manufacturer: self.aircraft_manufacturer.clone(),
            aircraft: self.aircraft.clone(),
            location: self.location.clone(),
            quarter: self.quarter.label().map(str::to_string),
            month: self.month.label().map(str::to_string),
            year: self.year,
            ground: self.ground,
            fatalities_air: self.fatalities_air,
            aboard: self.aboard,
        }
    }
}

/// Title-case a string: a letter following a non-letter is uppercased, any other letter lowercased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                // Titlecase: only the first char of a multi-char uppercase mapping stays upper
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("boeing"), "Boeing");
        assert_eq!(title_case("AIRBUS"), "Airbus");
        assert_eq!(title_case("united STATES of america"), "United States Of America");
        assert_eq!(title_case("mcdonnell-douglas"), "Mcdonnell-Douglas");
        assert_eq!(title_case("de havilland dh.89"), "De Havilland Dh.89");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_multi_char_uppercase() {
        assert_eq!(title_case("ßa"), "Ssa");
        assert_eq!(title_case("straße"), "Straße");
        for s in ["ßa", "ǆemal", "ﬂight"] {
            let once = title_case(s);
            assert_eq!(title_case(&once), once);
        }
    }

    #[test]
    fn test_quarter_parse_is_exact() {
        assert_eq!(Quarter::parse(Some("Qtr 3")), Quarter::Qtr3);
        assert_eq!(Quarter::parse(Some("qtr 3")), Quarter::Missing);
        assert_eq!(Quarter::parse(Some("Qtr 5")), Quarter::Missing);
        assert_eq!(Quarter::parse(Some("")), Quarter::Missing);
        assert_eq!(Quarter::parse(None), Quarter::Missing);
    }

    #[test]
    fn test_month_parse_and_order() {
        assert_eq!(Month::parse(Some("March")), Month::March);
        assert_eq!(Month::parse(Some("Mar")), Month::Missing);
        assert!(Month::January < Month::December);
        assert!(Quarter::Qtr1 < Quarter::Qtr4);
        assert_eq!(Month::DOMAIN.len(), 12);
        assert!(Month::DOMAIN.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_key_distinguishes_float_bits() {
        let record = AccidentRecord {
            country_region: "France".to_string(),
            operator: UNKNOWN.to_string(),
            aircraft_manufacturer: None,
            aircraft: None,
            location: None,
            quarter: Quarter::Qtr1,
            month: Month::January,
            year: 1950,
            ground: Some(0.0),
            fatalities_air: Some(3.0),
            aboard: None,
        };
        let mut other = record.clone();
        assert_eq!(record.key(), other.key());
        other.fatalities_air = Some(3.5);
        assert_ne!(record.key(), other.key());
    }

    #[test]
    fn test_to_raw_keeps_missing_categories_absent() {
        let record = AccidentRecord {
            country_region: "Peru".to_string(),
            operator: "Faucett".to_string(),
            aircraft_manufacturer: Some("Douglas".to_string()),
            aircraft: Some("DC-4".to_string()),
            location: Some("Lima".to_string()),
            quarter: Quarter::Missing,
            month: Month::May,
            year: 1960,
            ground: None,
            fatalities_air: Some(12.0),
            aboard: Some(14.0),
        };
        let raw = record.to_raw();
        assert_eq!(raw.quarter, None);
        assert_eq!(raw.month.as_deref(), Some("May"));
        assert_eq!(raw.year, 1960);
    }
}
