use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0)]
    Config(#[from] moodyme_core::firebase::ConfigError),

    #[error("{}", .0)]
    Identity(#[from] moodyme_core::identity::IdentityError),

    #[error("{}", .0)]
    Documents(#[from] moodyme_core::documents::DocumentError),

    #[error("{}", .0)]
    Content(#[from] moodyme_core::content::ContentError),

    #[error("{}", .0)]
    AdminSetup(#[from] moodyme_core::identity::admin::AdminSetupError),
}
