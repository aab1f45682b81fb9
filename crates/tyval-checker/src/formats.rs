//! Built-in string-format validators (spec §4.3.1 / §6).
//!
//! Each validator returns `""` on success or an English reason. The closed
//! set of recognized format names is [`is_known_format`].

use once_cell::sync::Lazy;
use regex::Regex;

pub const KNOWN_FORMATS: &[&str] = &[
    "IsoDate",
    "IsoDatetime",
    "TrimmedString",
    "Email",
    "PhoneNumber",
    "SocialSecurityNumber",
    "PostalCode",
    "Uuid",
    "NumericString",
    "DollarAmount",
    "UsState",
    "CountryCode",
];

pub fn is_known_format(name: &str) -> bool {
    KNOWN_FORMATS.contains(&name)
}

/// Dispatches to the validator for `name`. Panics if `name` is not one of
/// [`KNOWN_FORMATS`] — callers are expected to have validated this at
/// extraction time.
pub fn validate(name: &str, value: &str) -> String {
    match name {
        "IsoDate" => validate_iso_date(value),
        "IsoDatetime" => validate_iso_datetime(value),
        "TrimmedString" => validate_trimmed_string(value),
        "Email" => validate_email(value),
        "PhoneNumber" => validate_phone_number(value),
        "SocialSecurityNumber" => validate_ssn(value),
        "PostalCode" => validate_postal_code(value),
        "Uuid" => validate_uuid(value),
        "NumericString" => validate_numeric_string(value),
        "DollarAmount" => validate_dollar_amount(value),
        "UsState" => validate_us_state(value),
        "CountryCode" => validate_country_code(value),
        other => panic!("unknown special string format: {other}"),
    }
}

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static ISO_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+1\d{10}$").unwrap());
static POSTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());
static SSN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$").unwrap());
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});
static NUMERIC_STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|-?[1-9][0-9]*|-?[0-9]+\.[0-9]+)$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn validate_iso_date(value: &str) -> String {
    let Some(caps) = ISO_DATE_RE.captures(value) else {
        return format!("'{value}' is not a valid ISO date (expected YYYY-MM-DD)");
    };
    let year: i32 = caps[1].parse().unwrap();
    let month: u32 = caps[2].parse().unwrap();
    let day: u32 = caps[3].parse().unwrap();
    if !is_valid_calendar_date(year, month, day) {
        return format!("'{value}' is not a valid calendar date");
    }
    String::new()
}

fn validate_iso_datetime(value: &str) -> String {
    if ISO_DATE_RE.is_match(value) {
        return format!("'{value}' is a bare date; IsoDatetime requires a time component");
    }
    if !ISO_DATETIME_RE.is_match(value) {
        return format!("'{value}' is not a valid ISO datetime");
    }
    let date_part = &value[0..10];
    if let Some(caps) = ISO_DATE_RE.captures(date_part) {
        let year: i32 = caps[1].parse().unwrap();
        let month: u32 = caps[2].parse().unwrap();
        let day: u32 = caps[3].parse().unwrap();
        if !is_valid_calendar_date(year, month, day) {
            return format!("'{value}' is not a valid calendar date");
        }
    }
    String::new()
}

fn is_valid_calendar_date(year: i32, month: u32, day: u32) -> bool {
    if !(1..=12).contains(&month) || day == 0 {
        return false;
    }
    day <= days_in_month(year, month)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn validate_trimmed_string(value: &str) -> String {
    if value.is_empty() {
        return "TrimmedString must not be empty".to_string();
    }
    if value.len() > 100 {
        return "TrimmedString must be at most 100 characters".to_string();
    }
    check_trimmed(value, "TrimmedString")
}

fn validate_email(value: &str) -> String {
    if !EMAIL_RE.is_match(value) {
        return format!("'{value}' is not a valid email address");
    }
    check_trimmed(value, "Email")
}

fn validate_phone_number(value: &str) -> String {
    if !PHONE_RE.is_match(value) {
        return format!("'{value}' is not a valid phone number (expected +1 followed by 10 digits)");
    }
    String::new()
}

fn validate_ssn(value: &str) -> String {
    if !SSN_RE.is_match(value) {
        return format!("'{value}' is not a valid SSN (expected ###-##-####)");
    }
    String::new()
}

fn validate_postal_code(value: &str) -> String {
    if !POSTAL_RE.is_match(value) {
        return format!("'{value}' is not a valid postal code (expected 5 digits, optionally -4 digits)");
    }
    String::new()
}

fn validate_uuid(value: &str) -> String {
    if !UUID_RE.is_match(value) {
        return format!("'{value}' is not a valid UUID");
    }
    String::new()
}

fn validate_numeric_string(value: &str) -> String {
    if !NUMERIC_STRING_RE.is_match(value) {
        return format!("'{value}' is not a valid numeric string");
    }
    check_trimmed(value, "NumericString")
}

fn validate_dollar_amount(value: &str) -> String {
    let numeric = validate_numeric_string(value);
    if !numeric.is_empty() {
        return numeric;
    }
    if value.starts_with('-') {
        return format!("'{value}' is a DollarAmount and must be non-negative");
    }
    if let Some((_, frac)) = value.split_once('.') {
        if frac.len() > 2 {
            return format!("'{value}' has more than two fractional digits");
        }
    }
    String::new()
}

fn validate_us_state(value: &str) -> String {
    if US_STATES.contains(&value) {
        String::new()
    } else {
        format!("'{value}' is not a valid USPS two-letter state code")
    }
}

fn validate_country_code(value: &str) -> String {
    if COUNTRY_CODES.contains(&value) {
        String::new()
    } else {
        format!("'{value}' is not a valid ISO-3166-1 alpha-3 country code")
    }
}

fn check_trimmed(value: &str, format_name: &str) -> String {
    if value.trim() != value {
        format!("{format_name} must equal its own whitespace-trimmed form")
    } else {
        String::new()
    }
}

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC",
];

const COUNTRY_CODES: &[&str] = &[
    "USA", "CAN", "MEX", "GBR", "FRA", "DEU", "ITA", "ESP", "PRT", "NLD", "BEL", "CHE", "AUT",
    "SWE", "NOR", "DNK", "FIN", "IRL", "POL", "CZE", "GRC", "HUN", "ROU", "BGR", "HRV", "RUS",
    "UKR", "TUR", "CHN", "JPN", "KOR", "IND", "AUS", "NZL", "BRA", "ARG", "CHL", "COL", "PER",
    "ZAF", "EGY", "NGA", "KEN", "ISR", "SAU", "ARE", "SGP", "MYS", "THA", "VNM", "PHL", "IDN",
];
