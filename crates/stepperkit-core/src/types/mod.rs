//! Type aliases for shared state.
//!
//! - [`aliases`]: `Arc<RwLock<T>>` snapshot cells and shared stop flags

pub mod aliases;

pub use aliases::*;
