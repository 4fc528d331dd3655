//! Core ROC modules.

pub mod stable;
pub mod rank;
pub mod curve;
pub mod integrate;
pub mod roc;
pub mod batch;
