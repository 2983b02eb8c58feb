use crate::types::RgbFrame;
use anyhow::{Context, Result};
use nokhwa::Camera as NokhwaCamera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

/// Live video source held exclusively while a session streams.
///
/// Dropping the handle releases the device.
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbFrame>;
}

/// Acquires the camera at session start.
pub trait CameraProvider {
    type Device: FrameSource;

    fn acquire(&self) -> Result<Self::Device>;
}

/// Local webcam, addressed by device index.
pub struct WebcamProvider {
    device_id: u32,
}

impl WebcamProvider {
    pub fn new(device_id: u32) -> Self {
        Self { device_id }
    }
}

impl CameraProvider for WebcamProvider {
    type Device = Webcam;

    fn acquire(&self) -> Result<Webcam> {
        tracing::info!("starting camera capture from /dev/video{}", self.device_id);

        let index = CameraIndex::Index(self.device_id);
        let requested_format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut cam = NokhwaCamera::new(index, requested_format)
            .context("Failed to open camera device")?;
        cam.open_stream().context("Failed to start camera stream")?;

        let camera_format = cam.camera_format();
        tracing::info!(
            "camera properties: Resolution: {}x{}, FPS: {}",
            camera_format.width(),
            camera_format.height(),
            camera_format.frame_rate()
        );

        Ok(Webcam { cam })
    }
}

pub struct Webcam {
    cam: NokhwaCamera,
}

impl FrameSource for Webcam {
    fn grab(&mut self) -> Result<RgbFrame> {
        let frame = self.cam.frame().context("Frame capture failed")?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Frame decode failed")?;

        Ok(RgbFrame {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        })
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        let _ = self.cam.stop_stream();
        tracing::debug!("camera stream released");
    }
}
