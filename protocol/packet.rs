//! Wire model of the sampler control protocol.
//!
//! The message types are written out with prost's derive macros instead of
//! being generated at build time, so the crate needs no `protoc`. Field tags
//! must stay in sync with `protocol/sampler.proto`.

use std::fmt;

use prost::{Message, Oneof};
use serde::{Deserialize, Serialize};

use crate::error::{App, StdResult};

/// Play one sample on one output channel.
#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct PlayMessage {
    #[prost(string, tag = "1")]
    pub resource_locator: String,
    #[prost(uint32, tag = "2")]
    pub channel: u32,
}

/// Pre-fetch samples so a later play message does not wait on the network.
#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct CacheMessage {
    #[prost(string, repeated, tag = "1")]
    pub resource_locators: Vec<String>,
}

/// The one message a datagram carries.
#[derive(Clone, PartialEq, Oneof, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    #[prost(message, tag = "1")]
    Play(PlayMessage),
    #[prost(message, tag = "2")]
    Cache(CacheMessage),
}

impl Envelope {
    pub fn play(resource_locator: impl Into<String>, channel: u32) -> Self {
        Envelope::Play(PlayMessage {
            resource_locator: resource_locator.into(),
            channel,
        })
    }

    pub fn cache<I, S>(resource_locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Envelope::Cache(CacheMessage {
            resource_locators: resource_locators.into_iter().map(Into::into).collect(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Play(_) => "play",
            Envelope::Cache(_) => "cache",
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Play(msg) => {
                write!(f, "play {} on channel {}", msg.resource_locator, msg.channel)
            }
            Envelope::Cache(msg) => write!(
                f,
                "cache {} sample(s): {}",
                msg.resource_locators.len(),
                msg.resource_locators.join(", ")
            ),
        }
    }
}

/// Top-level protobuf message. A packet built by this crate always has
/// `content` set.
#[derive(Clone, PartialEq, Message)]
pub struct Packet {
    #[prost(oneof = "Envelope", tags = "1, 2")]
    pub content: Option<Envelope>,
}

impl Packet {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            content: Some(envelope),
        }
    }

    pub fn into_envelope(self) -> StdResult<Envelope> {
        self.content.ok_or(App::EmptyEnvelope)
    }

    pub fn to_datagram(&self) -> StdResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    pub fn from_datagram(bytes: &[u8]) -> StdResult<Self> {
        Ok(Self::decode(bytes)?)
    }
}

impl From<Envelope> for Packet {
    fn from(envelope: Envelope) -> Self {
        Packet::new(envelope)
    }
}

/// Decodes a datagram and returns the message it carries.
pub fn decode_envelope(bytes: &[u8]) -> StdResult<Envelope> {
    Packet::from_datagram(bytes)?.into_envelope()
}
