use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

use super::trace::{take_panic_trace, TraceSnapshot};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

const OPAQUE_PAYLOAD: &str = "opaque panic payload";

/// What a panic carried, converted into something printable.
#[derive(Debug, Error)]
pub enum PanicPayload {
    /// The panic carried an error value, kept as-is.
    #[error(transparent)]
    Error(BoxError),
    /// The panic carried text (or nothing printable).
    #[error("recovered from panic: {0}")]
    Message(String),
}

impl PanicPayload {
    fn from_any(payload: Box<dyn Any + Send + 'static>) -> Self {
        let payload = match payload.downcast::<BoxError>() {
            Ok(err) => return PanicPayload::Error(*err),
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(text) => return PanicPayload::Message(*text),
            Err(other) => other,
        };
        match payload.downcast_ref::<&'static str>() {
            Some(text) => PanicPayload::Message((*text).to_string()),
            None => PanicPayload::Message(OPAQUE_PAYLOAD.to_string()),
        }
    }
}

/// Error synthesized from a panic payload, with the stack recorded where the
/// panic started when a recovery boundary was active.
#[derive(Debug, Error)]
#[error("{payload}")]
pub struct CapturedError {
    payload: PanicPayload,
    trace: Option<TraceSnapshot>,
}

impl CapturedError {
    /// Converts the payload handed out by `catch_unwind`.
    ///
    /// Boxed errors raised with [`crate::abort::raise`] or
    /// [`crate::abort::with_trace`] keep their identity, `&str` and `String`
    /// payloads become [`PanicPayload::Message`].
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        CapturedError {
            payload: PanicPayload::from_any(payload),
            trace: None,
        }
    }

    /// Like [`CapturedError::from_panic`], also claiming the snapshot the
    /// panic hook recorded on this thread.
    pub(crate) fn from_unwind(payload: Box<dyn Any + Send + 'static>) -> Self {
        CapturedError {
            payload: PanicPayload::from_any(payload),
            trace: take_panic_trace(),
        }
    }

    pub fn payload(&self) -> &PanicPayload {
        &self.payload
    }

    /// Stack at the panic site, if it was recorded.
    pub fn trace(&self) -> Option<&TraceSnapshot> {
        self.trace.as_ref()
    }

    /// Payload text without the recovery marker.
    pub fn message(&self) -> String {
        match &self.payload {
            PanicPayload::Error(err) => err.to_string(),
            PanicPayload::Message(text) => text.clone(),
        }
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match &self.payload {
            PanicPayload::Error(err) => err.downcast_ref::<E>(),
            PanicPayload::Message(_) => None,
        }
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }
}
