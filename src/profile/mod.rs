//! Exploratory profiles of sparse matrices and matrix timelines.

mod changes;
mod range;
mod sparsity;

pub use changes::{detect_changes, ChangeProfile, TimelineChange};
pub use range::{
    profile_range, profile_range_with_precisions, PrecisionRequirement, RangeProfile,
    DEFAULT_PRECISIONS,
};
pub use sparsity::{profile_sparsity, SparsityProfile};
