//! Utility modules for the bond negotiation program

pub mod access;
pub mod validation;
