//! Ports (trait boundaries) between the decision model and its drivers.
//!
//! The simulator and search own the control flow. Decision rules plug in
//! through [`Policy`]; reporting and data collection plug in through
//! [`Observer`].

pub mod observer;
pub mod policy;

pub use observer::Observer;
pub use policy::Policy;
