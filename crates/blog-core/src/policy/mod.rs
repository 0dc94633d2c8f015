//! Who may read and who may change what.

pub mod access;
pub mod visibility;

pub use access::{
    MutationOutcome, can_mutate_comment, can_mutate_post, ensure_comment_owner,
    post_mutation_gate,
};
pub use visibility::{is_category_browsable, is_post_visible};
