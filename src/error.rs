use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to resolve {addr}")]
    Resolve { addr: String },
    #[error("invalid port: {port}")]
    InvalidPort { port: String },
    #[error("sampling rate {rate} is outside [0, 1]")]
    InvalidRate { rate: f64 },
    /// The sink already released its transport.
    #[error("sink is closed")]
    Closed,
}
