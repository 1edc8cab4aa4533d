//! Slides, their drawing surfaces, the whiteboard, and which one is on screen.
//!
//! `slides` and `drawings` always have the same length; a deck load replaces
//! both at once or leaves them alone.

use std::collections::VecDeque;

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::{info, warn};

use crate::config::{DECK_CAPACITY, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::debounce::NavContext;
use crate::error::Error;
use crate::types::{Canvas, Rgb};

/// Shown in slide mode before any deck is loaded.
const EMPTY_DECK_BACKGROUND: Rgb = Rgb::new(40, 40, 40);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Slide,
    Whiteboard,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Slide => "SLIDE",
            Mode::Whiteboard => "WHITEBOARD",
        }
    }
}

pub struct Presentation {
    width: usize,
    height: usize,
    slides: VecDeque<Canvas>,
    drawings: VecDeque<Canvas>,
    current: usize,
    mode: Mode,
    whiteboard: Canvas,
    whiteboard_drawing: Canvas,
    empty_background: Canvas,
    /// Bumped whenever anything that reaches the composed display may change.
    revision: u64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    pub fn new() -> Self {
        Self::with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slides: VecDeque::new(),
            drawings: VecDeque::new(),
            current: 0,
            mode: Mode::Slide,
            whiteboard: Canvas::filled(width, height, Rgb::WHITE),
            whiteboard_drawing: Canvas::blank(width, height),
            empty_background: Canvas::filled(width, height, EMPTY_DECK_BACKGROUND),
            revision: 0,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &VecDeque<Canvas> {
        &self.slides
    }

    pub fn drawings(&self) -> &VecDeque<Canvas> {
        &self.drawings
    }

    pub fn whiteboard_drawing(&self) -> &Canvas {
        &self.whiteboard_drawing
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replace the deck with `pages`, resized to the display. Only the last
    /// `DECK_CAPACITY` pages are kept. On error nothing changes.
    pub fn load_pages(&mut self, pages: Vec<RgbImage>) -> Result<usize, Error> {
        if pages.is_empty() {
            return Err(Error::EmptyDeck);
        }
        let evicted = pages.len().saturating_sub(DECK_CAPACITY);
        if evicted > 0 {
            warn!(pages = pages.len(), evicted, "deck exceeds capacity; dropping oldest pages");
        }

        let (w, h) = (self.width as u32, self.height as u32);
        let mut slides = VecDeque::with_capacity(pages.len() - evicted);
        let mut drawings = VecDeque::with_capacity(pages.len() - evicted);
        for page in pages.into_iter().skip(evicted) {
            let page = if page.dimensions() == (w, h) {
                page
            } else {
                imageops::resize(&page, w, h, FilterType::Triangle)
            };
            slides.push_back(Canvas::from_rgb_image(&page));
            drawings.push_back(Canvas::blank(self.width, self.height));
        }

        self.slides = slides;
        self.drawings = drawings;
        self.current = 0;
        self.touch();
        info!(slides = self.slides.len(), "deck loaded");
        Ok(self.slides.len())
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            self.touch();
            info!(slide = self.current, "next slide");
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            self.touch();
            info!(slide = self.current, "previous slide");
            true
        } else {
            false
        }
    }

    pub fn toggle_whiteboard(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Slide => Mode::Whiteboard,
            Mode::Whiteboard => Mode::Slide,
        };
        self.touch();
        info!(mode = self.mode.as_str(), "mode toggled");
        self.mode
    }

    pub fn nav_context(&self) -> NavContext {
        NavContext {
            enabled: self.mode == Mode::Slide,
            can_advance: self.current + 1 < self.slides.len(),
            can_retreat: self.current > 0,
        }
    }

    /// Image the drawing overlay is composited onto.
    pub fn background(&self) -> &Canvas {
        match self.mode {
            Mode::Whiteboard => &self.whiteboard,
            Mode::Slide => self.slides.get(self.current).unwrap_or(&self.empty_background),
        }
    }

    /// Surface strokes go to; `None` in slide mode with no deck loaded.
    pub fn active_drawing(&self) -> Option<&Canvas> {
        match self.mode {
            Mode::Whiteboard => Some(&self.whiteboard_drawing),
            Mode::Slide => self.drawings.get(self.current),
        }
    }

    /// Handing out the surface counts as a change.
    pub fn active_drawing_mut(&mut self) -> Option<&mut Canvas> {
        self.touch();
        match self.mode {
            Mode::Whiteboard => Some(&mut self.whiteboard_drawing),
            Mode::Slide => self.drawings.get_mut(self.current),
        }
    }

    pub fn clear_active(&mut self) {
        if let Some(surface) = self.active_drawing_mut() {
            surface.clear();
            info!(mode = self.mode.as_str(), slide = self.current, "drawing cleared");
        }
    }

    /// Status-line text: mode plus slide counter.
    pub fn label(&self) -> String {
        match self.mode {
            Mode::Whiteboard => "Whiteboard".to_string(),
            Mode::Slide => {
                let shown = if self.slides.is_empty() { 0 } else { self.current + 1 };
                format!("Slide {shown}/{}", self.slides.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    const W: usize = 64;
    const H: usize = 36;

    fn pages(k: usize) -> Vec<RgbImage> {
        (0..k)
            .map(|i| RgbImage::from_pixel(W as u32, H as u32, image::Rgb([i as u8, 0, 0])))
            .collect()
    }

    fn deck(k: usize) -> Presentation {
        let mut p = Presentation::with_size(W, H);
        p.load_pages(pages(k)).unwrap();
        p
    }

    fn scribble(p: &mut Presentation, x: i32) {
        let surface = p.active_drawing_mut().unwrap();
        crate::draw::fill_disc(surface, Point::new(x, 10), 2, Rgb::WHITE);
    }

    #[test]
    fn load_sets_parallel_empty_drawings() {
        let p = deck(5);
        assert_eq!(p.slide_count(), 5);
        assert_eq!(p.drawings().len(), 5);
        assert_eq!(p.current_index(), 0);
        assert!(p.drawings().iter().all(Canvas::is_empty));
    }

    #[test]
    fn load_resizes_pages_to_display() {
        let mut p = Presentation::with_size(W, H);
        let big = RgbImage::from_pixel(200, 100, image::Rgb([10, 20, 30]));
        p.load_pages(vec![big]).unwrap();
        let slide = &p.slides()[0];
        assert_eq!((slide.width, slide.height), (W, H));
        assert_eq!(slide.get(5, 5), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn load_keeps_only_the_newest_pages() {
        let mut p = Presentation::with_size(W, H);
        p.load_pages(pages(DECK_CAPACITY + 3)).unwrap();
        assert_eq!(p.slide_count(), DECK_CAPACITY);
        assert_eq!(p.drawings().len(), DECK_CAPACITY);
        assert_eq!(p.slides()[0].get(0, 0), Some(Rgb::new(3, 0, 0)));
    }

    #[test]
    fn empty_load_leaves_deck_untouched() {
        let mut p = deck(3);
        p.next();
        scribble(&mut p, 5);
        let slides = p.slides().clone();
        let drawings = p.drawings().clone();

        assert!(matches!(p.load_pages(Vec::new()), Err(Error::EmptyDeck)));
        assert_eq!(p.slides(), &slides);
        assert_eq!(p.drawings(), &drawings);
        assert_eq!(p.current_index(), 1);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut p = deck(3);
        assert!(!p.previous());
        assert_eq!(p.current_index(), 0);
        assert!(p.next());
        assert!(p.next());
        assert!(!p.next());
        assert_eq!(p.current_index(), 2);
        assert!(!p.nav_context().can_advance);
    }

    #[test]
    fn clear_only_touches_the_active_surface() {
        let mut p = deck(3);
        scribble(&mut p, 5);
        p.next();
        scribble(&mut p, 20);
        p.toggle_whiteboard();
        scribble(&mut p, 30);

        p.clear_active();
        assert!(p.whiteboard_drawing().is_empty());
        assert!(!p.drawings()[0].is_empty());
        assert!(!p.drawings()[1].is_empty());

        p.toggle_whiteboard();
        scribble(&mut p, 30); // slide 1 again
        p.toggle_whiteboard();
        scribble(&mut p, 30);
        p.toggle_whiteboard();
        p.clear_active();
        assert!(p.drawings()[1].is_empty());
        assert!(!p.drawings()[0].is_empty());
        assert!(!p.whiteboard_drawing().is_empty());
    }

    #[test]
    fn double_toggle_restores_slide_state() {
        let mut p = deck(4);
        p.next();
        p.next();
        scribble(&mut p, 12);
        let drawings = p.drawings().clone();

        assert_eq!(p.toggle_whiteboard(), Mode::Whiteboard);
        assert!(!p.nav_context().enabled);
        assert_eq!(p.background().get(0, 0), Some(Rgb::WHITE));
        assert_eq!(p.toggle_whiteboard(), Mode::Slide);

        assert_eq!(p.current_index(), 2);
        assert_eq!(p.drawings(), &drawings);
    }

    #[test]
    fn revision_moves_on_every_visible_change() {
        let mut p = deck(2);
        let mut last = p.revision();
        let mut changed = |p: &Presentation| {
            let moved = p.revision() != last;
            last = p.revision();
            moved
        };

        assert!(!p.previous());
        assert!(!changed(&p), "clamped navigation changes nothing");
        assert!(p.next());
        assert!(changed(&p));
        p.toggle_whiteboard();
        assert!(changed(&p));
        scribble(&mut p, 5);
        assert!(changed(&p));
        p.clear_active();
        assert!(changed(&p));
        p.load_pages(pages(1)).unwrap();
        assert!(changed(&p));
        assert!(p.load_pages(Vec::new()).is_err());
        assert!(!changed(&p));
    }

    #[test]
    fn no_deck_means_no_slide_surface() {
        let mut p = Presentation::with_size(W, H);
        assert!(p.active_drawing_mut().is_none());
        assert_eq!(p.background().get(0, 0), Some(EMPTY_DECK_BACKGROUND));
        assert_eq!(p.label(), "Slide 0/0");
        p.toggle_whiteboard();
        assert!(p.active_drawing().is_some());
        assert_eq!(p.label(), "Whiteboard");
    }
}
