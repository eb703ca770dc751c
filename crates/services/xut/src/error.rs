#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::error::Error),

    #[error(transparent)]
    Config(#[from] xut_config::error::Error),

    #[error(transparent)]
    Build(#[from] xut_build::error::Error),

    #[error(transparent)]
    Step(#[from] xut_core::error::Error),

    #[error("Xamarin UITest step failed")]
    StepFailed,
}
