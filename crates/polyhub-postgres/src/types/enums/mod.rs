//! Database enumeration types for type-safe queries.
//!
//! Each enumeration corresponds to a PostgreSQL ENUM type defined in the
//! migrations and maps through Diesel with `diesel-derive-enum`.

// Account-related enumerations
pub mod account_role;
pub mod notification_type;
pub mod verification_status;

// Catalog enumerations
pub mod taxonomy_kind;

// Marketplace enumerations
pub mod deal_status;
pub mod quote_status;
pub mod quote_type;
pub mod status_actor;

pub use account_role::AccountRole;
pub use deal_status::DealStatus;
pub use notification_type::NotificationType;
pub use quote_status::QuoteStatus;
pub use quote_type::QuoteType;
pub use status_actor::StatusActor;
pub use taxonomy_kind::TaxonomyKind;
pub use verification_status::VerificationStatus;
