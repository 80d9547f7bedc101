//! Adapter implementations of the port traits.
//!
//! - `live`: real disk and real processes.
//! - `recording`: wraps another adapter and writes every interaction to a cassette.
//! - `replaying`: answers from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
