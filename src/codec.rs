// Image codec boundary: inbound webcam JPEGs and outbound composed frames.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};

use crate::config::{JPEG_QUALITY, PROCESS_HEIGHT, PROCESS_WIDTH};
use crate::error::Error;
use crate::types::Canvas;

/// Decode an inbound frame, shrink it to the processing size and mirror it
/// horizontally so it matches what the user sees in a selfie view.
pub fn decode_frame(bytes: &[u8]) -> Result<Canvas, Error> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::FrameDecode(format!("Decode inbound frame: {e}")))?
        .to_rgb8();

    let mut img = if img.dimensions() == (PROCESS_WIDTH, PROCESS_HEIGHT) {
        img
    } else {
        imageops::resize(&img, PROCESS_WIDTH, PROCESS_HEIGHT, FilterType::Triangle)
    };
    imageops::flip_horizontal_in_place(&mut img);
    Ok(Canvas::from_rgb_image(&img))
}

pub fn encode_jpeg(frame: &Canvas) -> Result<Vec<u8>, Error> {
    let img = frame.to_rgb_image();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&img)
        .map_err(|e| Error::FrameEncode(format!("Encode JPEG: {e}")))?;
    Ok(out.into_inner())
}

/// Decode an outbound frame back to pixels (display side of the harness).
pub fn decode_display(bytes: &[u8]) -> Result<Canvas, Error> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::FrameDecode(format!("Decode composed frame: {e}")))?;
    Ok(Canvas::from_rgb_image(&img.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    #[test]
    fn frames_are_resized_and_mirrored() {
        // Left half dark, right half bright.
        let mut src = Canvas::blank(320, 240);
        for y in 0..240 {
            for x in 160..320 {
                src.pixels[y * 320 + x] = Rgb::WHITE.packed();
            }
        }
        let jpeg = encode_jpeg(&src).unwrap();
        let out = decode_frame(&jpeg).unwrap();

        assert_eq!((out.width, out.height), (PROCESS_WIDTH as usize, PROCESS_HEIGHT as usize));
        let left = out.get(20, 240).unwrap();
        let right = out.get(620, 240).unwrap();
        assert!(left.r > 200, "mirrored bright half should be on the left: {left:?}");
        assert!(right.r < 50, "{right:?}");
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        assert!(matches!(decode_frame(b"\xff\xd8garbage"), Err(Error::FrameDecode(_))));
        assert!(matches!(decode_frame(&[]), Err(Error::FrameDecode(_))));
    }

    #[test]
    fn encoded_frames_decode_at_full_size() {
        let src = Canvas::filled(64, 32, Rgb::new(0, 0, 200));
        let back = decode_display(&encode_jpeg(&src).unwrap()).unwrap();
        assert_eq!((back.width, back.height), (64, 32));
        let c = back.get(10, 10).unwrap();
        assert!(c.b > 180 && c.r < 30, "{c:?}");
    }
}
