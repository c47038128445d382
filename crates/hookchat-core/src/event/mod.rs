//! Event distribution for session observers.

pub mod bus;
