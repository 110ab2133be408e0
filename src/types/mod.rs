//! Strongly-typed domain types.
//!
//! - [`NumberFormat`]: the floating-point format every array is stored in
//! - [`PrognosticVariable`]: tags for the five prognostic fields
//!
//! # Example
//!
//! ```
//! use spectral_gcm::types::PrognosticVariable;
//!
//! assert!(PrognosticVariable::Temperature.is_layered());
//! ```

mod number_format;
mod variables;

pub use number_format::{convert_slice, NumberFormat};
pub use variables::PrognosticVariable;
