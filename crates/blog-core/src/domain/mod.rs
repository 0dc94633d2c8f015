//! Domain entities - the core business objects.

mod category;
mod draft;
mod post;
mod user;
mod viewer;

pub use category::{Category, Location};
pub use draft::{CommentDraft, NewAccount, PostDraft, ProfileChanges};
pub use post::{Comment, CommentEntry, Post, PostEntry};
pub use user::{Author, User};
pub use viewer::Viewer;
