//! Contains constraints, enumerations and pagination types.

mod constraints;
mod enums;
mod pagination;

pub use constraints::{
    AccountConstraints, AccountCredentialConstraints, BestDealConstraints, ConstraintCategory,
    ConstraintViolation, ProductConstraints, QuoteRequestConstraints, TaxonomyTermConstraints,
};
pub use enums::{
    AccountRole, DealStatus, NotificationType, QuoteStatus, QuoteType, StatusActor, TaxonomyKind,
    VerificationStatus,
};
pub use pagination::{MAX_LIMIT, OffsetPage, OffsetPagination};
