//! Domain helpers for the Begynn onboarding bridge.
//!
//! Nothing in this module performs I/O.  The render URL is a pure function of
//! its inputs, and identifier generation only touches the OS random source.

/// Installation identifier generation (UUID v4 layout).
pub mod uid;

/// Target URL construction for the embedded browser.
pub mod url;
