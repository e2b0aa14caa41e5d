//! HTTP transport used to talk to the artifact registry.
//!
//! The updater only needs authenticated `GET` requests with a streamed body,
//! so the transport is a small trait. [`HttpTransport`] is the `reqwest`
//! implementation; tests substitute an in-memory one.

mod client;

use std::fmt;
use std::io::Read;

use crate::Result;

pub use client::HttpTransport;

/// Blocking request/response transport.
pub trait Transport {
    /// Perform an authenticated GET request.
    ///
    /// Only a `200 OK` response is returned; any other status is reported as
    /// [`crate::SyncError::HttpStatus`] and network failures as
    /// [`crate::SyncError::Transport`].
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url)
    }
}

/// A successful response whose body has not been read yet.
///
/// The body is closed when the response is dropped.
pub struct TransportResponse {
    content_length: Option<u64>,
    body: Box<dyn Read + Send>,
}

impl TransportResponse {
    pub fn new(content_length: Option<u64>, body: Box<dyn Read + Send>) -> Self {
        Self {
            content_length,
            body,
        }
    }

    /// Response backed by an in-memory buffer
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self::new(Some(bytes.len() as u64), Box::new(std::io::Cursor::new(bytes)))
    }

    /// Size announced by the server, if any
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

impl Read for TransportResponse {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.body.read(buf)
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
