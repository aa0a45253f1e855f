//! Provisioning of the documentation toolchain.
//!
//! Creates a Python virtualenv (once) and installs the exact Sphinx and
//! Breathe versions the documentation build is known to work with.

pub mod pip;
pub mod provisioner;
pub mod venv;

pub use pip::{PackageSpec, Pip};
pub use provisioner::{ProvisionError, Provisioner, TOOLCHAIN};
pub use venv::VirtualEnv;
