//! Datebench Core Library
//!
//! Cross-validation of date/time libraries for micro-benchmarking.
//! Provides the operation registry, the operation catalog, input generation,
//! equivalence checking and YAML configuration.

pub mod catalog;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod generator;
pub mod inputs;
pub mod observe;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use catalog::{build_registry, OPERATION_NAMES};
pub use config::{Config, ConfigLoader, HarnessConfig};
pub use equivalence::{check_batches, EquivalenceChecker, EquivalenceReport};
pub use error::{
    DateBenchError, DateBenchResult, EquivalenceError, HardValidationError, RegistryError,
};
pub use generator::{InputGenerator, ShiftAmount};
pub use inputs::SharedInputs;
pub use registry::{nullary, Candidate, LibraryEntry, Operation, OperationRegistry};
pub use types::{Library, OperationFamily, OperationName, Projected, Projection};
