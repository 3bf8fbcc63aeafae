use flexi_logger::FlexiLoggerError;
use prost::{DecodeError, EncodeError};
use std::io::Error as IoError;
use thiserror::Error;

pub type StdResult<T> = std::result::Result<T, App>;

#[derive(Error, Debug)]
pub enum App {
    #[error("Address error: {0}")]
    Address(String),
    #[error("Socket error: {0}")]
    Socket(String),
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Send error: {0}")]
    Send(String),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Packet carries no message")]
    EmptyEnvelope,
    #[error("Logger initialization error: {0}")]
    Logger(#[from] FlexiLoggerError),
    #[error("I/O operation failed: {0}")]
    Io(#[from] IoError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
