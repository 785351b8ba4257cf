//! Keyword/regex input-purpose matcher
//!
//! Maps combined evidence text (label, placeholder, name attribute) plus
//! the input's type hint onto a WCAG input-purpose token. The pattern
//! table is ordered: more specific purposes must precede more general
//! ones within a category (e.g. `new-password` before the bare
//! `password` fallback of `current-password`). That ordering is an
//! invariant supplied by this table, not enforced by the matcher.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::{Category, ClassificationResult};

/// Ordered `(category, purpose, pattern)` table.
static PURPOSE_PATTERNS: LazyLock<Vec<(Category, &'static str, Regex)>> = LazyLock::new(|| {
    let entry = |category, purpose, pattern: &str| {
        (category, purpose, Regex::new(pattern).expect("static purpose pattern"))
    };
    vec![
        // Personal
        entry(Category::Personal, "name", r"(?i)\b(full\s*name|complete\s*name|your\s*name|user\s*name|username|login|account\s*name)\b"),
        entry(Category::Personal, "given-name", r"(?i)\b(first\s*name|given\s*name|forename)\b"),
        entry(Category::Personal, "family-name", r"(?i)\b(last\s*name|family\s*name|surname|lastname)\b"),
        entry(Category::Personal, "nickname", r"(?i)\b(nickname|display\s*name|screen\s*name)\b"),
        entry(Category::Personal, "honorific-prefix", r"(?i)\b(title|prefix|mr|mrs|ms|dr|prof)\b"),
        entry(Category::Personal, "honorific-suffix", r"(?i)\b(suffix|jr|sr|phd|md)\b"),
        entry(Category::Personal, "new-password", r"(?i)\b(new\s*password|create\s*password|set\s*password|password\s*confirmation)\b"),
        entry(Category::Personal, "current-password", r"(?i)\b(current\s*password|existing\s*password|password|pwd)\b"),
        entry(Category::Personal, "organization", r"(?i)\b(company|organization|employer|business)\b"),
        entry(Category::Personal, "organization-title", r"(?i)\b(job\s*title|position|role)\b"),
        entry(Category::Personal, "bday", r"(?i)\b(birth\s*date|birthday|date\s*of\s*birth|dob)\b"),
        entry(Category::Personal, "sex", r"(?i)\b(gender|sex)\b"),
        entry(Category::Personal, "language", r"(?i)\b(language|locale|lang)\b"),
        // Contact
        entry(Category::Contact, "email", r"(?i)\b(email|e-mail|electronic\s*mail)\b"),
        entry(Category::Contact, "tel", r"(?i)\b(phone|telephone|mobile|cell|tel)\b"),
        entry(Category::Contact, "url", r"(?i)\b(website|url|homepage|web\s*address)\b"),
        entry(Category::Contact, "impp", r"(?i)\b(skype|messenger|chat|im)\b"),
        // Address
        entry(Category::Address, "address-line1", r"(?i)\b(address\s*line\s*1|street\s*address|address\s*1)\b"),
        entry(Category::Address, "address-line2", r"(?i)\b(address\s*line\s*2|apartment|apt|suite|unit|address\s*2)\b"),
        entry(Category::Address, "street-address", r"(?i)\b(address|street|location)\b"),
        entry(Category::Address, "address-level1", r"(?i)\b(state|province|region)\b"),
        entry(Category::Address, "address-level2", r"(?i)\b(city|town|locality)\b"),
        entry(Category::Address, "country", r"(?i)\b(country|nation)\b"),
        entry(Category::Address, "postal-code", r"(?i)\b(zip|postal\s*code|postcode|zip\s*code)\b"),
        // Payment
        entry(Category::Payment, "cc-name", r"(?i)\b(card\s*holder|name\s*on\s*card|cardholder\s*name)\b"),
        entry(Category::Payment, "cc-number", r"(?i)\b(card\s*number|credit\s*card|debit\s*card|cc\s*number)\b"),
        entry(Category::Payment, "cc-exp-month", r"(?i)\b(exp\s*month|expir\w*\s*month)\b"),
        entry(Category::Payment, "cc-exp-year", r"(?i)\b(exp\s*year|expir\w*\s*year)\b"),
        entry(Category::Payment, "cc-exp", r"(?i)\b(expir|exp\s*date|expiration)"),
        entry(Category::Payment, "cc-csc", r"(?i)\b(cvv|cvc|security\s*code|card\s*code|csc)\b"),
        entry(Category::Payment, "cc-type", r"(?i)\b(card\s*type|payment\s*type)\b"),
    ]
});

/// Signals that an input collects information about the user at all.
static USER_INFO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(name|email|phone|address|birthday|age|gender|title)\b",
        r"(?i)\b(contact|telephone|mobile|website|url)\b",
        r"(?i)\b(street|city|state|country|zip|postal)\b",
        r"(?i)\b(card|credit|debit|payment|billing|cvv|expir)\b",
        r"(?i)\b(username|password|account|login|profile)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static user-info pattern"))
    .collect()
});

/// Whether the evidence suggests the field collects user information.
/// Password, email and tel inputs always do.
pub fn collects_user_information(evidence: &str, input_type: &str) -> bool {
    if matches!(input_type, "password" | "email" | "tel") {
        return true;
    }
    USER_INFO_PATTERNS.iter().any(|p| p.is_match(evidence))
}

/// Classify an input's purpose. Type-hint shortcuts are consulted first,
/// then the ordered pattern table, then a handful of broad contains
/// fallbacks; anything else is unmatched.
pub fn detect(evidence: &str, input_type: &str) -> ClassificationResult {
    match input_type {
        "email" => return ClassificationResult::matched(Category::Contact, "email"),
        "tel" => return ClassificationResult::matched(Category::Contact, "tel"),
        "password" => {
            let lower = evidence.to_lowercase();
            let purpose = if lower.contains("new") || lower.contains("confirm") || lower.contains("create")
            {
                "new-password"
            } else {
                "current-password"
            };
            return ClassificationResult::matched(Category::Personal, purpose);
        }
        _ => {}
    }

    for (category, purpose, pattern) in PURPOSE_PATTERNS.iter() {
        if pattern.is_match(evidence) {
            return ClassificationResult::matched(*category, purpose);
        }
    }

    let lower = evidence.to_lowercase();
    if lower.contains("address") || lower.contains("city") || lower.contains("zip") {
        return ClassificationResult::matched(Category::Address, "street-address");
    }
    if lower.contains("card") || lower.contains("payment") {
        return ClassificationResult::matched(Category::Payment, "cc-number");
    }
    if lower.contains("email") {
        return ClassificationResult::matched(Category::Contact, "email");
    }
    if lower.contains("name") {
        return ClassificationResult::matched(Category::Personal, "name");
    }

    ClassificationResult::unmatched()
}
