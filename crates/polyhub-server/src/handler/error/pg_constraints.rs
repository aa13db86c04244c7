//! Named PostgreSQL constraint violations mapped to HTTP errors.

use polyhub_postgres::types::{
    AccountConstraints, AccountCredentialConstraints, BestDealConstraints, ConstraintViolation,
    ProductConstraints, QuoteRequestConstraints, TaxonomyTermConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Account(c) => c.into(),
            ConstraintViolation::AccountCredential(c) => c.into(),
            ConstraintViolation::Product(c) => c.into(),
            ConstraintViolation::TaxonomyTerm(c) => c.into(),
            ConstraintViolation::BestDeal(c) => c.into(),
            ConstraintViolation::QuoteRequest(c) => c.into(),
        }
    }
}

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::DisplayNameLength => ErrorKind::BadRequest
                .with_message("Display name must be between 1 and 120 characters"),
            AccountConstraints::EmailAddressFormat => {
                ErrorKind::BadRequest.with_message("Invalid email format")
            }
            AccountConstraints::EmailAddressUnique => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("account")
    }
}

impl From<AccountCredentialConstraints> for Error<'static> {
    fn from(c: AccountCredentialConstraints) -> Self {
        let error = match c {
            AccountCredentialConstraints::PasswordHashNotEmpty => {
                ErrorKind::InternalServerError.into_error()
            }
            AccountCredentialConstraints::EmailAddressUnique => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
        };

        error.with_resource("account")
    }
}

impl From<ProductConstraints> for Error<'static> {
    fn from(c: ProductConstraints) -> Self {
        let error = match c {
            ProductConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Product name must be between 1 and 200 characters"),
            ProductConstraints::PriceNonNegative => {
                ErrorKind::BadRequest.with_message("Price cannot be negative")
            }
            ProductConstraints::StockNonNegative => {
                ErrorKind::BadRequest.with_message("Stock cannot be negative")
            }
            ProductConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            ProductConstraints::CreatedByReference => {
                ErrorKind::BadRequest.with_message("Owning account does not exist")
            }
            ProductConstraints::ChemicalFamilyReference
            | ProductConstraints::PolymerTypeReference
            | ProductConstraints::PaymentTermsReference => {
                ErrorKind::BadRequest.with_message("Referenced taxonomy term does not exist")
            }
        };

        error.with_resource("product")
    }
}

impl From<TaxonomyTermConstraints> for Error<'static> {
    fn from(c: TaxonomyTermConstraints) -> Self {
        let error = match c {
            TaxonomyTermConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Term name must be between 1 and 120 characters"),
            TaxonomyTermConstraints::KindNameUnique => {
                ErrorKind::Conflict.with_message("A term with this name already exists")
            }
        };

        error.with_resource("taxonomy_term")
    }
}

impl From<BestDealConstraints> for Error<'static> {
    fn from(c: BestDealConstraints) -> Self {
        let error = match c {
            BestDealConstraints::OfferPricePositive => {
                ErrorKind::BadRequest.with_message("Offer price must be positive")
            }
            BestDealConstraints::AdminNoteLength => {
                ErrorKind::BadRequest.with_message("Admin note cannot exceed 1000 characters")
            }
            BestDealConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            BestDealConstraints::ProductReference => {
                ErrorKind::NotFound.with_message("Product does not exist")
            }
            BestDealConstraints::SellerReference => {
                ErrorKind::NotFound.with_message("Seller account does not exist")
            }
        };

        error.with_resource("best_deal")
    }
}

impl From<QuoteRequestConstraints> for Error<'static> {
    fn from(c: QuoteRequestConstraints) -> Self {
        let error = match c {
            QuoteRequestConstraints::Discriminator => ErrorKind::BadRequest
                .with_message("Quote request fields do not match its request type"),
            QuoteRequestConstraints::MessageLength => {
                ErrorKind::BadRequest.with_message("Message cannot exceed 2000 characters")
            }
            QuoteRequestConstraints::VersionPositive
            | QuoteRequestConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
            QuoteRequestConstraints::ProductReference => ErrorKind::Conflict
                .with_message("The product is referenced by quote requests"),
            QuoteRequestConstraints::BestDealReference => ErrorKind::Conflict
                .with_message("The best deal is referenced by quote requests"),
        };

        error.with_resource("quote_request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_email_is_a_conflict() {
        let error = Error::from(ConstraintViolation::Account(
            AccountConstraints::EmailAddressUnique,
        ));

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("account"));
    }

    #[test]
    fn referenced_deal_cannot_be_deleted() {
        let error = Error::from(QuoteRequestConstraints::BestDealReference);
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("quote_request"));
    }
}
