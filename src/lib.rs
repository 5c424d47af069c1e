//! The library code for the `gazette` entry generator. A run is a single pass
//! over a directory of drafts:
//!
//! 1. Parsing each draft into a [`draft::Draft`] ([`crate::draft`])
//! 2. Checking its title against the titles seen earlier in the run
//!    ([`crate::dupe`])
//! 3. Picking a hero image from its sources ([`crate::hero`])
//! 4. Rendering and writing its entry page ([`crate::page`],
//!    [`crate::write`])
//!
//! Every rendered draft contributes an [`index::IndexRecord`]. Once all
//! drafts are done, the records are written to `entries.json` alongside a
//! static `index.html` listing page ([`crate::index`]). [`build::build_site`]
//! ties the steps together.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod draft;
pub mod dupe;
pub mod hero;
pub mod index;
pub mod page;
pub mod write;
