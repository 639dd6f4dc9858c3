//! Data layer
//!
//! Persistence for saved views. The filter engine itself performs no I/O;
//! callers load a view, hand its filter to the engine and store the result.

pub mod views;
