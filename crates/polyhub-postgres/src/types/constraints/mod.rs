//! Database constraint violations organized by functional area.

mod accounts;
mod catalog;
mod marketplace;

use std::fmt;

pub use accounts::{AccountConstraints, AccountCredentialConstraints};
pub use catalog::{ProductConstraints, TaxonomyTermConstraints};
pub use marketplace::{BestDealConstraints, QuoteRequestConstraints};
use serde::{Deserialize, Serialize};

/// Unified constraint violation enum that can represent any named constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    // Account-related constraints
    Account(AccountConstraints),
    AccountCredential(AccountCredentialConstraints),

    // Catalog constraints
    Product(ProductConstraints),
    TaxonomyTerm(TaxonomyTermConstraints),

    // Marketplace constraints
    BestDeal(BestDealConstraints),
    QuoteRequest(QuoteRequestConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (domain-specific rules).
    BusinessLogic,
    /// Uniqueness constraints (unique indexes).
    Uniqueness,
    /// Foreign key constraints.
    Reference,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyhub_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("accounts_email_address_unique_idx");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("accounts_") {
            AccountConstraints::new(constraint).map(Self::Account)
        } else if constraint.starts_with("account_credentials_") {
            AccountCredentialConstraints::new(constraint).map(Self::AccountCredential)
        } else if constraint.starts_with("products_") {
            ProductConstraints::new(constraint).map(Self::Product)
        } else if constraint.starts_with("taxonomy_terms_") {
            TaxonomyTermConstraints::new(constraint).map(Self::TaxonomyTerm)
        } else if constraint.starts_with("best_deals_") {
            BestDealConstraints::new(constraint).map(Self::BestDeal)
        } else if constraint.starts_with("quote_requests_") {
            QuoteRequestConstraints::new(constraint).map(Self::QuoteRequest)
        } else {
            None
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Account(_) => "accounts",
            ConstraintViolation::AccountCredential(_) => "account_credentials",
            ConstraintViolation::Product(_) => "products",
            ConstraintViolation::TaxonomyTerm(_) => "taxonomy_terms",
            ConstraintViolation::BestDeal(_) => "best_deals",
            ConstraintViolation::QuoteRequest(_) => "quote_requests",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
            ConstraintViolation::AccountCredential(c) => c.categorize(),
            ConstraintViolation::Product(c) => c.categorize(),
            ConstraintViolation::TaxonomyTerm(c) => c.categorize(),
            ConstraintViolation::BestDeal(c) => c.categorize(),
            ConstraintViolation::QuoteRequest(c) => c.categorize(),
        }
    }

    /// Returns the original constraint name.
    pub fn constraint_name(&self) -> String {
        match self {
            ConstraintViolation::Account(c) => c.to_string(),
            ConstraintViolation::AccountCredential(c) => c.to_string(),
            ConstraintViolation::Product(c) => c.to_string(),
            ConstraintViolation::TaxonomyTerm(c) => c.to_string(),
            ConstraintViolation::BestDeal(c) => c.to_string(),
            ConstraintViolation::QuoteRequest(c) => c.to_string(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint_name())
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.constraint_name()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_table_prefix() {
        assert_eq!(
            ConstraintViolation::new("quote_requests_discriminator"),
            Some(ConstraintViolation::QuoteRequest(
                QuoteRequestConstraints::Discriminator
            ))
        );
        assert_eq!(
            ConstraintViolation::new("account_credentials_email_address_unique_idx"),
            Some(ConstraintViolation::AccountCredential(
                AccountCredentialConstraints::EmailAddressUnique
            ))
        );
        assert_eq!(ConstraintViolation::new("quote_requests_unknown"), None);
    }

    #[test]
    fn categorizes_references() {
        let violation = ConstraintViolation::new("quote_requests_best_deal_id_fkey").unwrap();
        assert_eq!(violation.categorize(), ConstraintCategory::Reference);
        assert_eq!(violation.table_name(), "quote_requests");
        assert_eq!(violation.to_string(), "quote_requests_best_deal_id_fkey");
    }
}
