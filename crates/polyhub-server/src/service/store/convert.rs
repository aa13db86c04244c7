//! Conversions between database enums and their marketplace counterparts.
//!
//! Both crates define the same vocabularies independently, so the mapping
//! is spelled out variant by variant.

use polyhub_core::deal::DealStatus;
use polyhub_core::notify::NotificationKind;
use polyhub_core::quote::{QuoteStatus, QuoteType, StatusActor};
use polyhub_core::types::{AccountRole, AccountSummary, VerificationStatus};
use polyhub_postgres::model::Account;
use polyhub_postgres::types as pg;

pub fn core_role(role: pg::AccountRole) -> AccountRole {
    match role {
        pg::AccountRole::Buyer => AccountRole::Buyer,
        pg::AccountRole::Seller => AccountRole::Seller,
        pg::AccountRole::Admin => AccountRole::Admin,
        pg::AccountRole::Expert => AccountRole::Expert,
    }
}

pub fn pg_role(role: AccountRole) -> pg::AccountRole {
    match role {
        AccountRole::Buyer => pg::AccountRole::Buyer,
        AccountRole::Seller => pg::AccountRole::Seller,
        AccountRole::Admin => pg::AccountRole::Admin,
        AccountRole::Expert => pg::AccountRole::Expert,
    }
}

pub fn core_verification(status: pg::VerificationStatus) -> VerificationStatus {
    match status {
        pg::VerificationStatus::Pending => VerificationStatus::Pending,
        pg::VerificationStatus::Approved => VerificationStatus::Approved,
        pg::VerificationStatus::Rejected => VerificationStatus::Rejected,
        pg::VerificationStatus::Verified => VerificationStatus::Verified,
    }
}

pub(super) fn core_quote_status(status: pg::QuoteStatus) -> QuoteStatus {
    match status {
        pg::QuoteStatus::Pending => QuoteStatus::Pending,
        pg::QuoteStatus::Responded => QuoteStatus::Responded,
        pg::QuoteStatus::Negotiation => QuoteStatus::Negotiation,
        pg::QuoteStatus::Accepted => QuoteStatus::Accepted,
        pg::QuoteStatus::InProgress => QuoteStatus::InProgress,
        pg::QuoteStatus::Shipped => QuoteStatus::Shipped,
        pg::QuoteStatus::Delivered => QuoteStatus::Delivered,
        pg::QuoteStatus::Completed => QuoteStatus::Completed,
        pg::QuoteStatus::Rejected => QuoteStatus::Rejected,
        pg::QuoteStatus::Cancelled => QuoteStatus::Cancelled,
    }
}

pub(super) fn pg_quote_status(status: QuoteStatus) -> pg::QuoteStatus {
    match status {
        QuoteStatus::Pending => pg::QuoteStatus::Pending,
        QuoteStatus::Responded => pg::QuoteStatus::Responded,
        QuoteStatus::Negotiation => pg::QuoteStatus::Negotiation,
        QuoteStatus::Accepted => pg::QuoteStatus::Accepted,
        QuoteStatus::InProgress => pg::QuoteStatus::InProgress,
        QuoteStatus::Shipped => pg::QuoteStatus::Shipped,
        QuoteStatus::Delivered => pg::QuoteStatus::Delivered,
        QuoteStatus::Completed => pg::QuoteStatus::Completed,
        QuoteStatus::Rejected => pg::QuoteStatus::Rejected,
        QuoteStatus::Cancelled => pg::QuoteStatus::Cancelled,
    }
}

pub(super) fn core_actor(actor: pg::StatusActor) -> StatusActor {
    match actor {
        pg::StatusActor::Buyer => StatusActor::Buyer,
        pg::StatusActor::Seller => StatusActor::Seller,
        pg::StatusActor::Admin => StatusActor::Admin,
    }
}

pub(super) fn pg_actor(actor: StatusActor) -> pg::StatusActor {
    match actor {
        StatusActor::Buyer => pg::StatusActor::Buyer,
        StatusActor::Seller => pg::StatusActor::Seller,
        StatusActor::Admin => pg::StatusActor::Admin,
    }
}

pub(super) fn core_quote_type(request_type: pg::QuoteType) -> QuoteType {
    match request_type {
        pg::QuoteType::ProductQuote => QuoteType::ProductQuote,
        pg::QuoteType::DealQuote => QuoteType::DealQuote,
    }
}

pub(super) fn pg_quote_type(request_type: QuoteType) -> pg::QuoteType {
    match request_type {
        QuoteType::ProductQuote => pg::QuoteType::ProductQuote,
        QuoteType::DealQuote => pg::QuoteType::DealQuote,
    }
}

pub(super) fn core_deal_status(status: pg::DealStatus) -> DealStatus {
    match status {
        pg::DealStatus::Pending => DealStatus::Pending,
        pg::DealStatus::Approved => DealStatus::Approved,
        pg::DealStatus::Rejected => DealStatus::Rejected,
    }
}

pub(super) fn pg_deal_status(status: DealStatus) -> pg::DealStatus {
    match status {
        DealStatus::Pending => pg::DealStatus::Pending,
        DealStatus::Approved => pg::DealStatus::Approved,
        DealStatus::Rejected => pg::DealStatus::Rejected,
    }
}

pub(super) fn pg_notification_type(kind: NotificationKind) -> pg::NotificationType {
    match kind {
        NotificationKind::QuoteRequested => pg::NotificationType::QuoteRequested,
        NotificationKind::QuoteStatusChanged => pg::NotificationType::QuoteStatusChanged,
        NotificationKind::QuoteResponded => pg::NotificationType::QuoteResponded,
        NotificationKind::DealDecision => pg::NotificationType::DealDecision,
    }
}

pub(super) fn account_summary(account: Account) -> AccountSummary {
    AccountSummary {
        id: account.id,
        display_name: account.display_name,
        company_name: account.company_name,
        email_address: account.email_address,
        role: core_role(account.role),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn quote_statuses_round_trip() {
        for status in QuoteStatus::iter() {
            assert_eq!(core_quote_status(pg_quote_status(status)), status);
        }
    }

    #[test]
    fn roles_round_trip() {
        for role in AccountRole::iter() {
            assert_eq!(core_role(pg_role(role)), role);
        }
    }

    #[test]
    fn deal_statuses_round_trip() {
        for status in DealStatus::iter() {
            assert_eq!(core_deal_status(pg_deal_status(status)), status);
        }
    }
}
