//! Display casing for output values
//!
//! Only applied to rows and options handed back to the caller; filtering and
//! storage always see the normalized lowercase values.

use crate::dataset::{split_tokens, Transaction};

/// First character upper-cased, remainder lower-cased.
///
/// `"north east"` becomes `"North east"`. Empty input passes through.
pub fn display_case(value: &str) -> String {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        None => value.to_string(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Display-cases every token of a comma-separated tag list
pub fn display_tags(tags: &str) -> String {
    if tags.is_empty() {
        return String::new();
    }
    split_tokens(tags)
        .map(display_case)
        .collect::<Vec<_>>()
        .join(",")
}

/// Returns a copy of the record with display casing applied to the
/// categorical fields and tags.
pub fn format_transaction(record: &Transaction) -> Transaction {
    Transaction {
        gender: display_case(&record.gender),
        customer_region: display_case(&record.customer_region),
        product_category: display_case(&record.product_category),
        payment_method: display_case(&record.payment_method),
        tags: display_tags(&record.tags),
        ..record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_case() {
        assert_eq!(display_case("north east"), "North east");
        assert_eq!(display_case("UPI"), "Upi");
        assert_eq!(display_case("m"), "M");
        assert_eq!(display_case(""), "");
    }

    #[test]
    fn test_display_tags() {
        assert_eq!(display_tags("organic,skincare"), "Organic,Skincare");
        assert_eq!(display_tags("eco-friendly, ,fashion"), "Eco-friendly,Fashion");
        assert_eq!(display_tags(""), "");
    }

    #[test]
    fn test_format_leaves_other_fields() {
        let record = Transaction {
            gender: "female".into(),
            customer_name: "neha khan".into(),
            tags: "organic".into(),
            ..Default::default()
        };
        let formatted = format_transaction(&record);
        assert_eq!(formatted.gender, "Female");
        assert_eq!(formatted.tags, "Organic");
        assert_eq!(formatted.customer_name, "neha khan");
        assert_eq!(record.gender, "female");
    }
}
