//! Arithmetic helpers for pool calculations.
//!
//! Amounts are unbounded, so the only hazard left is division by zero, which
//! [`mul_div`] reports as `None`.  Every division floors.

mod rounding;

pub use rounding::mul_div;
