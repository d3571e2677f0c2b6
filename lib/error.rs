use crate::transport::Collision;

pub type Result<T, PIN> = core::result::Result<T, Error<PIN>>;

#[derive(Debug, PartialEq)]
pub enum Error<PIN> {
    // Alert output pin error
    Alert(PIN),
    // Put while a transfer was still in flight
    Collision,
}

impl<PIN> Error<PIN> {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Alert(_) => "alert pin",
            Error::Collision => "write collision",
        }
    }
}

impl<PIN> From<Collision> for Error<PIN> {
    fn from(_: Collision) -> Self {
        Error::Collision
    }
}
