//! Crate error type
//!
//! Gameplay actions are total and never fail. Errors only cross the platform
//! seams: opening an audio backend, talking to storage, parsing tuning files.

/// Result alias carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The audio backend could not be created (missing API, no user gesture yet)
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    /// A call into an open audio backend failed
    #[error("audio error: {0}")]
    Audio(String),
    /// Key-value storage rejected a read or write
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn audio<T: Into<String>>(msg: T) -> Self {
        Self::Audio(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl Error {
    /// Describe a JS exception thrown by a web API
    pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
        value.as_string().unwrap_or_else(|| format!("{:?}", value))
    }
}
