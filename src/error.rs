// Error type for the collaborators around the compositor.
// The pixel core itself never fails; every variant states *where* things went wrong.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    #[error("camera init error: {0}")]
    CameraInit(String),

    #[error("camera frame error: {0}")]
    CameraFrame(String),

    #[error("background load error: {0}")]
    BackgroundLoad(String),

    #[error("frame load error: {0}")]
    FrameLoad(String),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn frame_load(msg: impl Into<String>) -> Self {
        Self::FrameLoad(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        assert!(Error::config("x").to_string().starts_with("config error:"));
        assert!(Error::frame_load("x").to_string().starts_with("frame load error:"));
        assert!(
            Error::BackgroundLoad("missing.png".into())
                .to_string()
                .contains("missing.png")
        );
    }
}
