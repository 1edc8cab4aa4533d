// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("frame decode error: {0}")]
    FrameDecode(String), // Inbound bytes were not a readable image
    #[error("frame encode error: {0}")]
    FrameEncode(String), // Composed display could not be compressed
    #[error("deck conversion error: {0}")]
    DeckConversion(String), // Converter could not rasterize the document
    #[error("deck conversion produced no pages")]
    EmptyDeck,
    #[error("window init error: {0}")]
    WindowInit(String),
    #[error("window update error: {0}")]
    WindowUpdate(String),
    #[error("camera init error: {0}")]
    CameraInit(String),
    #[error("camera frame error: {0}")]
    CameraFrame(String),
}
