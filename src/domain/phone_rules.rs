use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Per-country phone rule: digit-count bounds plus a pattern applied to the
/// stripped number. Adding a country is a data change, not a logic change.
pub struct PhoneRule {
    pub min_digits: usize,
    pub max_digits: usize,
    pub pattern: Regex,
}

impl PhoneRule {
    fn new(min_digits: usize, max_digits: usize, pattern: &str) -> Self {
        PhoneRule {
            min_digits,
            max_digits,
            pattern: Regex::new(pattern).expect("invalid phone rule pattern"),
        }
    }
}

static PHONE_RULES: Lazy<HashMap<&'static str, PhoneRule>> = Lazy::new(|| {
    HashMap::from([
        // Indian mobiles: exactly 10 digits, first digit 6-9
        ("+91", PhoneRule::new(10, 10, r"^[6-9][0-9]{9}$")),
        ("+1", PhoneRule::new(10, 10, r"^[2-9][0-9]{9}$")),
        ("+44", PhoneRule::new(10, 11, r"^[1-9][0-9]{9,10}$")),
        ("+61", PhoneRule::new(9, 9, r"^[0-9]{9}$")),
        ("+971", PhoneRule::new(9, 9, r"^[0-9]{9}$")),
        ("+65", PhoneRule::new(8, 8, r"^[689][0-9]{7}$")),
        ("+60", PhoneRule::new(9, 10, r"^[0-9]{9,10}$")),
        ("+86", PhoneRule::new(11, 11, r"^1[0-9]{10}$")),
        ("+81", PhoneRule::new(10, 11, r"^[0-9]{10,11}$")),
        ("+49", PhoneRule::new(10, 11, r"^[0-9]{10,11}$")),
    ])
});

pub fn rule_for(country_code: &str) -> Option<&'static PhoneRule> {
    PHONE_RULES.get(country_code)
}

pub fn supported_country(country_code: &str) -> bool {
    PHONE_RULES.contains_key(country_code)
}

/// Remove the formatting characters users paste along with numbers
/// (spaces, hyphens, parentheses, dots) before length/pattern checks.
pub fn strip_formatting(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// Validate a raw phone number against the stated country's rule.
/// Unknown country codes fail closed.
pub fn validate_phone(country_code: &str, raw_phone: &str) -> Result<(), &'static str> {
    let rule = match rule_for(country_code) {
        Some(rule) => rule,
        None => return Err("Unsupported country code"),
    };

    let stripped = strip_formatting(raw_phone);
    if !stripped.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number may only contain digits");
    }
    if stripped.len() < rule.min_digits || stripped.len() > rule.max_digits {
        return Err("Phone number has the wrong number of digits for the selected country");
    }
    if !rule.pattern.is_match(&stripped) {
        return Err("Phone number is not valid for the selected country");
    }

    Ok(())
}
