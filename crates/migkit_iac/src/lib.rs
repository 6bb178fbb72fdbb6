//! # migkit_iac
//!
//! Terraform CLI invocation for migkit.
//!
//! Every Terraform verb the migration needs is modelled by [`TerraformCommand`]
//! and executed through a [`CommandRunner`], so the sequence can be driven
//! against the real binary ([`ProcessRunner`]) or a [`RecordingRunner`] in
//! tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use migkit_iac::{ProcessRunner, TerraformRunner};
//!
//! let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new()));
//! terraform.init_and_apply(Path::new("exporters/tfc")).unwrap();
//! ```

pub mod command;
pub mod error;
pub mod mock;
pub mod process;
pub mod terraform;

pub use command::{TerraformCommand, SPACELIFT_LOGIN_HOST};
pub use error::{IacError, IacResult};
pub use mock::{CapturedCall, RecordingRunner};
pub use process::{CommandRunner, ProcessRunner, ProcessSpec, StdioMode};
pub use terraform::TerraformRunner;
