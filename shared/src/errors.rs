//! Shared error types for the order intake client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Serialization failed: {message}")]
    SerializationError { message: String },

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Invalid value: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Session subscriber not found: {subscriber}")]
    SubscriberNotFound { subscriber: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
