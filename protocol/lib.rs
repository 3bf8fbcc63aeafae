//! Client side of the sampler control protocol.
//!
//! A sampler listens on one UDP port for protobuf [`packet::Packet`]s, each
//! carrying either a play or a cache message. [`emitter::Emitter`] sends one
//! such datagram per call; [`listener::Listener`] decodes them the way the
//! sampler does.

pub mod config;
pub mod emitter;
pub mod error;
pub mod listener;
pub mod logging;
pub mod packet;

pub use config::{EmitterConfig, ListenerConfig, DEFAULT_ADDRESS, DEFAULT_PORT};
pub use emitter::{Delivery, Emitter};
pub use error::{App, StdResult};
pub use listener::Listener;
pub use packet::{decode_envelope, CacheMessage, Envelope, Packet, PlayMessage};
