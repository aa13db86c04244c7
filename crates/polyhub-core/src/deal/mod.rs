//! Best deal lifecycle.
//!
//! Sellers propose a discounted offer on one of their products. An admin
//! approves or rejects it; only approved, unexpired deals are listed to
//! buyers.

mod manager;
mod model;

pub use manager::{BestDealManager, DealPage};
pub use model::{
    BestDeal, CreateOutcome, DealChanges, DealDecisionInput, DealEditInput, DealFacet,
    DealFilter, DealStatus, DecisionOutcome, NewDealInput, NewDealRecord,
};
