//! # Shared Types Crate
//!
//! The ticket value, its token codec, and every payload that crosses a
//! process boundary. Both the authority and the gates depend on this crate;
//! nothing else is shared between them.
//!
//! ## Contents
//!
//! - `ticket` - [`Ticket`], [`TicketTimestamp`], expiry and validity checks
//! - `codec` - canonical JSON form and the base64 token (`encode`/`decode`)
//! - `wire` - REST bodies and bus payloads
//! - `time` - the [`TimeSource`] port

pub mod codec;
pub mod ticket;
pub mod time;
pub mod wire;

pub use codec::{decode, encode, MalformedTokenError};
pub use ticket::{Ticket, TicketTimestamp, TIMESTAMP_FORMAT};
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use wire::*;
