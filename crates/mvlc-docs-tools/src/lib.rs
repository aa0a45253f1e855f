//! External tool invocation for the mesytec-mvlc documentation build.
//!
//! Every step of the build shells out to a third-party program (python, pip,
//! doxygen, sphinx-build, lessc). This crate describes those calls as
//! [`Invocation`] values and runs them through a [`ToolRunner`], so the steps
//! themselves can be driven by a scripted runner in tests.

pub mod invocation;
#[cfg(any(test, feature = "testing"))]
pub mod recording;
pub mod system;
pub mod traits;

pub use invocation::Invocation;
#[cfg(any(test, feature = "testing"))]
pub use recording::RecordingRunner;
pub use system::SystemRunner;
pub use traits::{ToolError, ToolOutput, ToolRunner};
