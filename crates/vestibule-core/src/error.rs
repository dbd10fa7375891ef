use thiserror::Error;

#[derive(Debug, Error)]
pub enum VestibuleError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("unknown icon: {0}")]
    UnknownIcon(String),

    #[error("unknown audio cue: {0}")]
    UnknownCue(String),

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("slot {slot} is outside the grid (size {grid_size})")]
    SlotOutOfRange { slot: usize, grid_size: usize },

    #[error("invalid kit item '{0}': expected 'name' or 'name:count'")]
    InvalidKitItem(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, VestibuleError>;
