use std::fmt;

/// Errors from the outer surfaces: configuration and the event loop.
/// The pulse core itself cannot fail.
#[derive(Debug)]
pub enum LabError {
    /// Reading a configuration file failed
    Io(std::io::Error),
    /// A configuration file is not valid JSON for `LabConfig`
    Config(serde_json::Error),
    /// A setting is out of its usable range
    InvalidSetting(String),
    /// The windowing event loop could not start or stopped abnormally
    EventLoop(winit::error::EventLoopError),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::Io(error) => write!(f, "I/O error: {error}"),
            LabError::Config(error) => write!(f, "Bad configuration: {error}"),
            LabError::InvalidSetting(setting) => write!(f, "Invalid setting: {setting}"),
            LabError::EventLoop(error) => write!(f, "Event loop failed: {error}"),
        }
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabError::Io(error) => Some(error),
            LabError::Config(error) => Some(error),
            LabError::InvalidSetting(_) => None,
            LabError::EventLoop(error) => Some(error),
        }
    }
}

impl From<std::io::Error> for LabError {
    fn from(error: std::io::Error) -> Self {
        LabError::Io(error)
    }
}

impl From<serde_json::Error> for LabError {
    fn from(error: serde_json::Error) -> Self {
        LabError::Config(error)
    }
}

impl From<winit::error::EventLoopError> for LabError {
    fn from(error: winit::error::EventLoopError) -> Self {
        LabError::EventLoop(error)
    }
}
