pub mod backend;
pub mod camera;
pub mod config;
pub mod encode;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;
pub mod types;

pub use backend::{HttpBackend, SessionApi};
pub use camera::{CameraProvider, FrameSource, WebcamProvider};
pub use error::SessionError;
pub use session::{CaptureSession, SessionState};
pub use transport::{ChannelOpener, FrameChannel, WsOpener};
pub use types::{Handshake, RgbFrame, Student};
