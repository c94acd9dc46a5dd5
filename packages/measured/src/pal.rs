//! Platform abstraction layer for the timestamp source.
//!
//! The timeline only ever talks to a [`TimeSourceFacade`], which dispatches either to the real
//! monotonic clock of the operating system or, in tests, to a mock that hands out scripted
//! instants.

mod abstractions;
mod facade;
#[cfg(test)]
mod mock;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
#[cfg(test)]
pub(crate) use mock::*;
pub(crate) use real::*;
