//! One presenter per connected client. Frames for a session run one at a
//! time; different sessions share nothing.

use std::sync::Mutex;

use image::RgbImage;
use tracing::{error, info_span};

use crate::deck::DeckConverter;
use crate::error::Error;
use crate::landmarks::HandDetector;
use crate::orchestrator::{FrameResult, Presenter};

pub struct Session<D> {
    id: String,
    presenter: Mutex<Presenter<D>>,
}

impl<D: HandDetector> Session<D> {
    pub fn new(id: impl Into<String>, detector: D) -> Self {
        Self::with_presenter(id, Presenter::new(detector))
    }

    pub fn with_presenter(id: impl Into<String>, presenter: Presenter<D>) -> Self {
        Self {
            id: id.into(),
            presenter: Mutex::new(presenter),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn process_frame(&self, bytes: &[u8]) -> Option<FrameResult> {
        let _span = info_span!("frame", session = %self.id).entered();
        self.with(|p| p.process_frame(bytes)).flatten()
    }

    pub fn load_deck(&self, document: &[u8], converter: &impl DeckConverter) -> Result<usize, Error> {
        let _span = info_span!("deck", session = %self.id).entered();
        self.with(|p| p.load_deck(document, converter))
            .unwrap_or_else(|| Err(Error::DeckConversion("session unavailable".into())))
    }

    pub fn load_pages(&self, pages: Vec<RgbImage>) -> Result<usize, Error> {
        self.with(|p| p.load_pages(pages))
            .unwrap_or_else(|| Err(Error::DeckConversion("session unavailable".into())))
    }

    /// Run `f` under the session lock. `None` if a previous frame panicked
    /// while holding it.
    pub fn with<R>(&self, f: impl FnOnce(&mut Presenter<D>) -> R) -> Option<R> {
        match self.presenter.lock() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(_) => {
                error!(session = %self.id, "session state poisoned");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::codec::encode_jpeg;
    use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
    use crate::landmarks::{FingerStates, KeypointSet, ScriptedDetector};
    use crate::types::{Canvas, Rgb};

    fn pages(n: usize) -> Vec<RgbImage> {
        (0..n)
            .map(|_| RgbImage::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32))
            .collect()
    }

    #[test]
    fn sessions_do_not_share_state() {
        let next = KeypointSet::synthetic(0.5, 0.5, FingerStates::from_bits(0b11100));
        let a = Arc::new(Session::new("a", ScriptedDetector::new(vec![Some(next); 6])));
        let b = Arc::new(Session::new("b", ScriptedDetector::default()));
        a.load_pages(pages(3)).unwrap();
        b.load_pages(pages(3)).unwrap();

        let handles: Vec<_> = [a.clone(), b.clone()]
            .into_iter()
            .map(|s| {
                thread::spawn(move || {
                    for i in 0..6u8 {
                        // A different picture each time so the frame cache never short-circuits.
                        let shade = 40 * i;
                        let bytes = encode_jpeg(&Canvas::filled(32, 24, Rgb::new(shade, shade, shade))).unwrap();
                        assert!(s.process_frame(&bytes).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(a.with(|p| p.presentation().current_index()), Some(1));
        assert_eq!(b.with(|p| p.presentation().current_index()), Some(0));
    }

    #[test]
    fn bad_deck_is_reported_per_session() {
        let s = Session::new("c", ScriptedDetector::default());
        s.load_pages(pages(2)).unwrap();
        assert!(s.load_deck(b"nope", &crate::deck::ImageDeckConverter).is_err());
        assert_eq!(s.with(|p| p.presentation().slide_count()), Some(2));
        assert_eq!(s.id(), "c");
    }
}
