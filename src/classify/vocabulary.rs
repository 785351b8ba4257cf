//! Controlled vocabulary of WCAG 2.1 input-purpose tokens (Section 7).

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::Category;

const PERSONAL_TOKENS: &[&str] = &[
    "name",
    "honorific-prefix",
    "given-name",
    "additional-name",
    "family-name",
    "honorific-suffix",
    "nickname",
    "username",
    "new-password",
    "current-password",
    "organization-title",
    "organization",
    "bday",
    "bday-day",
    "bday-month",
    "bday-year",
    "sex",
    "photo",
    "language",
];

const CONTACT_TOKENS: &[&str] = &[
    "email",
    "tel",
    "tel-country-code",
    "tel-national",
    "tel-area-code",
    "tel-local",
    "tel-local-prefix",
    "tel-local-suffix",
    "tel-extension",
    "impp",
    "url",
];

const ADDRESS_TOKENS: &[&str] = &[
    "street-address",
    "address-line1",
    "address-line2",
    "address-line3",
    "address-level4",
    "address-level3",
    "address-level2",
    "address-level1",
    "country",
    "country-name",
    "postal-code",
];

const PAYMENT_TOKENS: &[&str] = &[
    "cc-name",
    "cc-given-name",
    "cc-additional-name",
    "cc-family-name",
    "cc-number",
    "cc-exp",
    "cc-exp-month",
    "cc-exp-year",
    "cc-csc",
    "cc-type",
    "transaction-currency",
    "transaction-amount",
];

static TOKEN_CATEGORIES: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for token in PERSONAL_TOKENS {
        map.insert(*token, Category::Personal);
    }
    for token in CONTACT_TOKENS {
        map.insert(*token, Category::Contact);
    }
    for token in ADDRESS_TOKENS {
        map.insert(*token, Category::Address);
    }
    for token in PAYMENT_TOKENS {
        map.insert(*token, Category::Payment);
    }
    map
});

/// Look up which category a single vocabulary token belongs to.
pub fn token_category(token: &str) -> Option<Category> {
    TOKEN_CATEGORIES.get(token.to_lowercase().as_str()).copied()
}

/// Validate an `autocomplete` attribute value against the vocabulary.
///
/// The value is lowercased and split on whitespace; it is valid when at
/// least one token is a recognized purpose token. `on` and `off` are
/// accepted only when they are the sole token, since they toggle
/// autofill without identifying a purpose.
pub fn validate(value: &str) -> bool {
    let lower = value.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }
    if tokens.iter().any(|t| matches!(*t, "on" | "off")) {
        // Autofill toggles are valid only as the sole token.
        return tokens.len() == 1;
    }
    tokens.iter().any(|t| TOKEN_CATEGORIES.contains_key(t))
}
