//! User-facing datasets.
//!
//! A dataset is constructed from a [`DatasetConfig`]: construction acquires
//! the raw archives (when allowed) and indexes the extracted tree; item
//! access decodes one sample at a time.

mod advance;
mod config;

pub use advance::{
    Advance, AdvanceBuilder, ADVANCE_ARCHIVES, ADVANCE_CLASSES, ADVANCE_MD5S, ADVANCE_URLS,
};
pub use config::DatasetConfig;
