//! Dakids-Common: shared types and errors.
//!
//! This crate provides the data model shared by the addon server, the
//! embed proxy and the resolver crate:
//!
//! - **Episodes**: the immutable playlist entries loaded at startup
//! - **Streams**: the resolved-or-external [`StreamEntry`] union
//! - **Addon wire types**: manifest, catalog descriptors and meta previews
//! - **YouTube helpers**: watch and thumbnail URLs, video id checks
//! - **Error Handling**: episode list load errors and result alias
//!
//! # Examples
//!
//! ```
//! use dakids_common::{youtube, StreamEntry};
//!
//! let entry = StreamEntry::unresolved("Bluey", "abc");
//! assert!(!entry.playable_inline());
//! assert_eq!(youtube::watch_url("abc"), "https://www.youtube.com/watch?v=abc");
//! ```

pub mod error;
pub mod types;
pub mod youtube;

pub use error::{Error, Result};
pub use types::*;
