//! Transaction record and the typed field catalogue
//!
//! Every record is fully populated after load: numeric fields that could not
//! be parsed are zero, string fields that were absent are empty.

use serde::{Deserialize, Serialize};

/// A single normalized sales transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub transaction_id: u64,
    /// ISO `YYYY-MM-DD`, compared lexicographically
    pub date: String,
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub gender: String,
    pub age: u32,
    pub customer_region: String,
    pub customer_type: String,
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    pub product_category: String,
    /// Comma-separated lowercase tokens
    pub tags: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub discount_percentage: f64,
    pub total_amount: f64,
    pub final_amount: f64,
    pub payment_method: String,
    pub order_status: String,
    pub delivery_type: String,
    pub store_id: String,
    pub store_location: String,
    pub salesperson_id: String,
    pub employee_name: String,
}

impl Transaction {
    /// Returns the text value of a string-typed field.
    ///
    /// Numeric fields return `None`.
    pub fn text(&self, field: TransactionField) -> Option<&str> {
        use TransactionField as F;
        let value = match field {
            F::Date => &self.date,
            F::CustomerId => &self.customer_id,
            F::CustomerName => &self.customer_name,
            F::PhoneNumber => &self.phone_number,
            F::Gender => &self.gender,
            F::CustomerRegion => &self.customer_region,
            F::CustomerType => &self.customer_type,
            F::ProductId => &self.product_id,
            F::ProductName => &self.product_name,
            F::Brand => &self.brand,
            F::ProductCategory => &self.product_category,
            F::Tags => &self.tags,
            F::PaymentMethod => &self.payment_method,
            F::OrderStatus => &self.order_status,
            F::DeliveryType => &self.delivery_type,
            F::StoreId => &self.store_id,
            F::StoreLocation => &self.store_location,
            F::SalespersonId => &self.salesperson_id,
            F::EmployeeName => &self.employee_name,
            F::TransactionId
            | F::Age
            | F::Quantity
            | F::PricePerUnit
            | F::DiscountPercentage
            | F::TotalAmount
            | F::FinalAmount => return None,
        };
        Some(value.as_str())
    }

    /// Iterates the individual trimmed, non-empty tag tokens
    pub fn tag_tokens(&self) -> impl Iterator<Item = &str> {
        split_tokens(&self.tags)
    }

    /// Discount applied to this transaction
    pub fn discount_amount(&self) -> f64 {
        self.total_amount - self.final_amount
    }
}

/// Splits a comma-separated list into trimmed, non-empty tokens
pub fn split_tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Every field of a [`Transaction`], addressable without string lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionField {
    TransactionId,
    Date,
    CustomerId,
    CustomerName,
    PhoneNumber,
    Gender,
    Age,
    CustomerRegion,
    CustomerType,
    ProductId,
    ProductName,
    Brand,
    ProductCategory,
    Tags,
    Quantity,
    PricePerUnit,
    DiscountPercentage,
    TotalAmount,
    FinalAmount,
    PaymentMethod,
    OrderStatus,
    DeliveryType,
    StoreId,
    StoreLocation,
    SalespersonId,
    EmployeeName,
}

impl TransactionField {
    pub const ALL: [TransactionField; 26] = [
        TransactionField::TransactionId,
        TransactionField::Date,
        TransactionField::CustomerId,
        TransactionField::CustomerName,
        TransactionField::PhoneNumber,
        TransactionField::Gender,
        TransactionField::Age,
        TransactionField::CustomerRegion,
        TransactionField::CustomerType,
        TransactionField::ProductId,
        TransactionField::ProductName,
        TransactionField::Brand,
        TransactionField::ProductCategory,
        TransactionField::Tags,
        TransactionField::Quantity,
        TransactionField::PricePerUnit,
        TransactionField::DiscountPercentage,
        TransactionField::TotalAmount,
        TransactionField::FinalAmount,
        TransactionField::PaymentMethod,
        TransactionField::OrderStatus,
        TransactionField::DeliveryType,
        TransactionField::StoreId,
        TransactionField::StoreLocation,
        TransactionField::SalespersonId,
        TransactionField::EmployeeName,
    ];

    /// Column / document key name
    pub fn name(&self) -> &'static str {
        use TransactionField as F;
        match self {
            F::TransactionId => "transaction_id",
            F::Date => "date",
            F::CustomerId => "customer_id",
            F::CustomerName => "customer_name",
            F::PhoneNumber => "phone_number",
            F::Gender => "gender",
            F::Age => "age",
            F::CustomerRegion => "customer_region",
            F::CustomerType => "customer_type",
            F::ProductId => "product_id",
            F::ProductName => "product_name",
            F::Brand => "brand",
            F::ProductCategory => "product_category",
            F::Tags => "tags",
            F::Quantity => "quantity",
            F::PricePerUnit => "price_per_unit",
            F::DiscountPercentage => "discount_percentage",
            F::TotalAmount => "total_amount",
            F::FinalAmount => "final_amount",
            F::PaymentMethod => "payment_method",
            F::OrderStatus => "order_status",
            F::DeliveryType => "delivery_type",
            F::StoreId => "store_id",
            F::StoreLocation => "store_location",
            F::SalespersonId => "salesperson_id",
            F::EmployeeName => "employee_name",
        }
    }

    /// Looks a field up by its normalized column name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Fields stored lower-cased by the loader
    pub fn is_lowercased(&self) -> bool {
        matches!(
            self,
            TransactionField::Gender
                | TransactionField::CustomerRegion
                | TransactionField::ProductCategory
                | TransactionField::PaymentMethod
                | TransactionField::Tags
        )
    }
}

/// Low-cardinality fields exposed as filter dimensions and option lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    CustomerRegion,
    Gender,
    ProductCategory,
    PaymentMethod,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::CustomerRegion,
        CategoricalField::Gender,
        CategoricalField::ProductCategory,
        CategoricalField::PaymentMethod,
    ];

    pub fn field(&self) -> TransactionField {
        match self {
            CategoricalField::CustomerRegion => TransactionField::CustomerRegion,
            CategoricalField::Gender => TransactionField::Gender,
            CategoricalField::ProductCategory => TransactionField::ProductCategory,
            CategoricalField::PaymentMethod => TransactionField::PaymentMethod,
        }
    }

    pub fn value<'a>(&self, record: &'a Transaction) -> &'a str {
        match self {
            CategoricalField::CustomerRegion => &record.customer_region,
            CategoricalField::Gender => &record.gender,
            CategoricalField::ProductCategory => &record.product_category,
            CategoricalField::PaymentMethod => &record.payment_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in TransactionField::ALL {
            assert_eq!(TransactionField::from_name(field.name()), Some(field));
        }
        assert_eq!(TransactionField::from_name("unknown"), None);
    }

    #[test]
    fn test_text_only_for_string_fields() {
        let t = Transaction {
            customer_name: "Neha Khan".into(),
            ..Default::default()
        };
        assert_eq!(t.text(TransactionField::CustomerName), Some("Neha Khan"));
        assert_eq!(t.text(TransactionField::Quantity), None);
    }

    #[test]
    fn test_tag_tokens_skip_blanks() {
        let t = Transaction {
            tags: "organic, skincare,,".into(),
            ..Default::default()
        };
        let tokens: Vec<_> = t.tag_tokens().collect();
        assert_eq!(tokens, vec!["organic", "skincare"]);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let t: Transaction = serde_json::from_str(r#"{"transaction_id": 7}"#).unwrap();
        assert_eq!(t.transaction_id, 7);
        assert_eq!(t.quantity, 0);
        assert!(t.customer_name.is_empty());
    }
}
