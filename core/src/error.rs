use thiserror::Error;

#[derive(Debug, Error)]
pub enum AprsError {
    #[error("Call sign '{callsign}' is too long ({len} characters, max 6)")]
    CallsignTooLong { callsign: String, len: usize },

    #[error("Call sign is empty")]
    EmptyCallsign,

    #[error("Call sign '{callsign}' contains characters that cannot be encoded")]
    InvalidCallsignChar { callsign: String },

    #[error("SSID {0} out of range (0-15)")]
    SsidOutOfRange(u32),

    #[error("Invalid SSID: {0}")]
    InvalidSsid(String),

    #[error("Too many path entries ({0}, max 8)")]
    TooManyPathEntries(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Frame already transmitted")]
    FrameComplete,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, AprsError>;
