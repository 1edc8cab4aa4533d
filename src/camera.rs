// Webcam source for the harness.
// Visual expectation: each `next_frame()` hands back one live camera image as a
// Canvas of 0x00RRGGBB pixels; main.rs JPEG-encodes it and feeds the presenter,
// so the camera is the "inbound frame" a remote client would normally send.

use gesture_deck::error::Error;
use gesture_deck::types::Canvas;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};
use tracing::info;

/// Thin wrapper around an open nokhwa stream so the frame loop stays short.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` as close to `width` x `height` at 30 fps as the
    /// device allows. On success the stream is running; nothing is on screen
    /// until the first frame goes through the presenter.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        // YUYV is uncompressed, so turning it into RGB is cheap.
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // Fails when there is no device at `index`; main.rs then falls back to a grey feed.
        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The driver may settle on a slightly different size than requested.
        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), "camera streaming");
        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame and convert it to packed pixels.
    /// Blocks until the device delivers; at 30 fps that is at most ~33 ms.
    pub fn next_frame(&mut self) -> Result<Canvas, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        // nokhwa decodes whatever raw format the device chose into RGB8.
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;
        Ok(Canvas::from_rgb_image(&rgb))
    }

    /// The resolution the camera actually delivers (logged once at startup).
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
