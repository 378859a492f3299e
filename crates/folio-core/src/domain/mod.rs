//! Domain entities - the core business objects.

mod draft;
mod filter;
mod post;

pub use draft::{
    EXTERNAL_LINK_PREFIX, MAX_AUTHOR_CHARS, MAX_EXCERPT_CHARS, MAX_TAG_CHARS, MAX_TITLE_CHARS,
    PostDraft, TagsInput,
};
pub use filter::{ALL_CATEGORIES, PostFilter};
pub use post::{Category, DEFAULT_READ_TIME, NewPost, Post, UnknownCategory, ViewSeed};
