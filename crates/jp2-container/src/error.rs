#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    InvalidBox,
    Truncated { offset: usize },
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBox => write!(f, "box length is smaller than its header"),
            Self::Truncated { offset } => {
                write!(f, "box at offset {offset} extends past the end of its parent")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
