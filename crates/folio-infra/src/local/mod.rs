//! Client-side fallback store.

mod repo;
mod storage;

pub use repo::{LocalPostRepository, POSTS_KEY};
pub use storage::{FileLocalStorage, InMemoryLocalStorage};
