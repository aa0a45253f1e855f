//! Documentation build for the mesytec-mvlc library.
//!
//! Runs Doxygen over the library sources to produce an XML API model, scrubs
//! known-noisy warnings from its log, renders HTML with Sphinx + Breathe and
//! finally compiles the site stylesheet with `lessc`.

pub mod builder;
pub mod doxygen;
pub mod sources;
pub mod versions;
pub mod warnings;

pub use builder::{
    BuildError, BuildOptions, BuildResult, DocBuilder, StyleOptions, LESSC_GUIDANCE,
};
pub use doxygen::DoxygenConfig;
pub use sources::discover_sources;
pub use versions::{navigation_versions, recent_versions};
pub use warnings::{FilteredLog, WarningFilter};
