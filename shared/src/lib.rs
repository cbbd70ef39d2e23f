// shared/src/lib.rs

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("network: {0}")]
    Network(String),
    #[error("timed out after {0} ms")]
    Timeout(u64),
    #[error("remote returned HTTP {status}")]
    HttpStatus { status: u16, body: Option<String> },
    #[error("parse: {0}")]
    Parse(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    pub fn as_secs(&self) -> u64 {
        self.0 / 1000
    }
}

pub mod config;
