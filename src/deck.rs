// Seam for turning an uploaded document into slide rasters.
// Real document formats are handled by an external converter; the built-in
// one accepts a single encoded picture as a one-page deck.

use image::RgbImage;

use crate::error::Error;

pub trait DeckConverter {
    /// One raster per page, in order. Any failure rejects the whole document.
    fn convert(&self, document: &[u8]) -> Result<Vec<RgbImage>, Error>;
}

/// Any format the `image` crate can decode becomes a single slide.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDeckConverter;

impl DeckConverter for ImageDeckConverter {
    fn convert(&self, document: &[u8]) -> Result<Vec<RgbImage>, Error> {
        let page = image::load_from_memory(document)
            .map_err(|e| Error::DeckConversion(format!("Decode page: {e}")))?;
        Ok(vec![page.to_rgb8()])
    }
}

/// Already-rasterized pages, each its own encoded image.
pub fn decode_pages<'a>(pages: impl IntoIterator<Item = &'a [u8]>) -> Result<Vec<RgbImage>, Error> {
    pages
        .into_iter()
        .enumerate()
        .map(|(i, bytes)| {
            image::load_from_memory(bytes)
                .map(|img| img.to_rgb8())
                .map_err(|e| Error::DeckConversion(format!("Decode page {}: {e}", i + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 4, image::Rgb(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn single_image_is_a_one_page_deck() {
        let pages = ImageDeckConverter.convert(&png([1, 2, 3])).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn garbage_is_a_conversion_error() {
        let err = ImageDeckConverter.convert(b"not a document").unwrap_err();
        assert!(matches!(err, Error::DeckConversion(_)));
    }

    #[test]
    fn one_bad_page_fails_the_batch() {
        let good = png([9, 9, 9]);
        let ok = decode_pages([good.as_slice(), good.as_slice()]).unwrap();
        assert_eq!(ok.len(), 2);
        let err = decode_pages([good.as_slice(), b"junk".as_slice()]).unwrap_err();
        assert!(err.to_string().contains("page 2"));
    }
}
