//! Diagnostics of the model state.
//!
//! - [`diagnose`]: physical grid fields (winds in m/s, temperature, humidity,
//!   surface pressure in Pa) from the spectral state
//! - [`GlobalDiagnostics`]: area- and mass-weighted global summaries
//!
//! # Example
//!
//! ```ignore
//! use spectral_gcm::analysis::diagnose;
//!
//! let diag = diagnose(model.state().present(), model.transform());
//! let global = diag.global(model.geometry());
//! println!("mean T = {:.2} K, max wind = {:.1} m/s", global.mean_temperature, global.max_wind_speed);
//! ```

mod diagnostics;

pub use diagnostics::{area_mean, diagnose, GlobalDiagnostics, GridDiagnostics};
