mod aggregator;
mod calldata;
mod claims_lookup;
mod deployments;
mod distribution_builder;
mod fee_schedule;
pub mod records;
pub mod validation;

pub use aggregator::{bribes_from_events, generate_distribution, reactor_breakdown, reactor_votes};
pub use calldata::{
    ClaimParams, RootUpdatePayload, claimCall, encode_claim_calldata, generate_calldata,
    updateMerkleRootsCall,
};
pub use claims_lookup::{ClaimsLookup, LookupError};
pub use deployments::{ContractAddresses, Deployments};
pub use distribution_builder::*;
pub use fee_schedule::{FEE_DENOMINATOR, FeeSchedule, net_of_fee};
pub use validation::{IntegrityMismatch, MismatchKind, ValidationReport};

// Re-export the primitives callers need to build inputs
pub use votemak_merkle::{Account, Amount, B256, TreeScheme};
