use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The work buffer cannot hold the region a traversal of the requested length touches.
    BufferTooSmall { required: usize, capacity: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BufferTooSmall { required, capacity } => write!(
                f,
                "Work buffer too small: traversal needs {} words but only {} are allocated.",
                required, capacity
            ),
        }
    }
}

impl std::error::Error for Error {}
