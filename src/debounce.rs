//! Turns the noisy per-frame gesture stream into at most one action per frame.
//!
//! Two independent timers run here: a short general cooldown that every new
//! gesture must outlast, and a longer navigation dwell that keeps a wavering
//! palm from flipping several slides. NEXT, PREVIOUS and CLEAR are
//! edge-triggered through a latch that re-arms only when the gesture changes;
//! DRAW is continuous and yields a stroke every frame it is held.

use crate::config::{CONTROL_HEIGHT, GESTURE_COOLDOWN, NAVIGATION_DWELL};
use crate::gesture::Gesture;
use crate::types::Point;

/// What the presentation allows this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavContext {
    /// False in whiteboard mode.
    pub enabled: bool,
    pub can_advance: bool,
    pub can_retreat: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Extend (or start) the current stroke to this point.
    Stroke(Point),
    /// Show the transient pointer marker here.
    Pointer(Point),
    Next,
    Previous,
    Clear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Forget the pen anchor so the next stroke starts fresh.
    pub lift_pen: bool,
    pub action: Option<Action>,
}

#[derive(Debug, Default)]
pub struct Debouncer {
    last: Option<Gesture>,
    cooldown: u32,
    nav_lock: u32,
    latched: bool,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_gesture(&self) -> Option<Gesture> {
        self.last
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn navigation_lock(&self) -> u32 {
        self.nav_lock
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Feed one classified frame.
    pub fn step(&mut self, gesture: Gesture, pointer: Point, nav: NavContext) -> Dispatch {
        let mut out = Dispatch::default();

        if self.last != Some(gesture) {
            self.cooldown = GESTURE_COOLDOWN;
            self.latched = false;
            out.lift_pen = gesture.is_command();
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.nav_lock = self.nav_lock.saturating_sub(1);

        if self.cooldown == 0 {
            out.action = self.fire(gesture, pointer, nav, &mut out.lift_pen);
        }

        self.last = Some(gesture);
        out
    }

    fn fire(&mut self, gesture: Gesture, pointer: Point, nav: NavContext, lift_pen: &mut bool) -> Option<Action> {
        let below_panel = pointer.y > CONTROL_HEIGHT;
        match gesture {
            Gesture::Draw => below_panel.then_some(Action::Stroke(pointer)),
            Gesture::Pointer => {
                *lift_pen = true;
                below_panel.then_some(Action::Pointer(pointer))
            }
            Gesture::Next | Gesture::Previous => {
                if !nav.enabled || self.nav_lock > 0 || self.latched {
                    return None;
                }
                self.latched = true;
                let (possible, action) = if gesture == Gesture::Next {
                    (nav.can_advance, Action::Next)
                } else {
                    (nav.can_retreat, Action::Previous)
                };
                // At the ends of the deck the latch still engages but nothing moves.
                if !possible {
                    return None;
                }
                self.nav_lock = NAVIGATION_DWELL;
                Some(action)
            }
            Gesture::Clear => {
                if self.latched {
                    return None;
                }
                self.latched = true;
                Some(Action::Clear)
            }
            Gesture::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREE: NavContext = NavContext {
        enabled: true,
        can_advance: true,
        can_retreat: true,
    };
    const BELOW: Point = Point::new(300, 300);

    fn hold(d: &mut Debouncer, g: Gesture, frames: usize, nav: NavContext) -> Vec<Action> {
        (0..frames).filter_map(|_| d.step(g, BELOW, nav).action).collect()
    }

    #[test]
    fn new_gesture_waits_out_the_cooldown() {
        let mut d = Debouncer::new();
        for _ in 0..(GESTURE_COOLDOWN - 1) {
            assert_eq!(d.step(Gesture::Clear, BELOW, FREE).action, None);
        }
        assert_eq!(d.step(Gesture::Clear, BELOW, FREE).action, Some(Action::Clear));
    }

    #[test]
    fn held_commands_fire_once() {
        for (g, want) in [
            (Gesture::Next, Action::Next),
            (Gesture::Previous, Action::Previous),
            (Gesture::Clear, Action::Clear),
        ] {
            let mut d = Debouncer::new();
            let fired = hold(&mut d, g, 60, FREE);
            assert_eq!(fired, vec![want], "{g}");
        }
    }

    #[test]
    fn latch_rearms_after_gesture_changes() {
        let mut d = Debouncer::new();
        assert_eq!(hold(&mut d, Gesture::Clear, 10, FREE).len(), 1);
        hold(&mut d, Gesture::None, 3, FREE);
        assert_eq!(hold(&mut d, Gesture::Clear, 10, FREE), vec![Action::Clear]);
    }

    #[test]
    fn draw_is_continuous() {
        let mut d = Debouncer::new();
        let n = 12;
        let warmup = (GESTURE_COOLDOWN - 1) as usize;
        let strokes = hold(&mut d, Gesture::Draw, warmup + n, FREE);
        assert_eq!(strokes.len(), n);
        assert!(strokes.iter().all(|a| matches!(a, Action::Stroke(_))));
    }

    #[test]
    fn draw_inside_the_panel_band_does_nothing() {
        let mut d = Debouncer::new();
        for _ in 0..10 {
            let out = d.step(Gesture::Draw, Point::new(300, CONTROL_HEIGHT), FREE);
            assert_eq!(out.action, None);
        }
    }

    #[test]
    fn pointer_lifts_the_pen() {
        let mut d = Debouncer::new();
        let mut last = Dispatch::default();
        for _ in 0..GESTURE_COOLDOWN {
            last = d.step(Gesture::Pointer, BELOW, FREE);
        }
        assert!(last.lift_pen);
        assert_eq!(last.action, Some(Action::Pointer(BELOW)));
    }

    #[test]
    fn command_transition_lifts_pen_immediately() {
        let mut d = Debouncer::new();
        hold(&mut d, Gesture::Draw, 8, FREE);
        assert!(d.step(Gesture::Next, BELOW, FREE).lift_pen);

        let mut d = Debouncer::new();
        hold(&mut d, Gesture::Draw, 8, FREE);
        assert!(!d.step(Gesture::None, BELOW, FREE).lift_pen);
    }

    #[test]
    fn navigation_arms_the_dwell_lock() {
        let mut d = Debouncer::new();
        let fired = hold(&mut d, Gesture::Next, GESTURE_COOLDOWN as usize, FREE);
        assert_eq!(fired, vec![Action::Next]);
        assert_eq!(d.navigation_lock(), NAVIGATION_DWELL);
        assert!(d.is_latched());
    }

    #[test]
    fn dwell_blocks_a_quick_second_navigation() {
        let mut d = Debouncer::new();
        hold(&mut d, Gesture::Next, GESTURE_COOLDOWN as usize, FREE);
        hold(&mut d, Gesture::None, 2, FREE);

        // Lock reaches zero 15 frames after the first navigation, i.e. on the
        // 13th frame of the renewed NEXT hold.
        let mut fired_at = None;
        for frame in 1..=20 {
            if d.step(Gesture::Next, BELOW, FREE).action == Some(Action::Next) {
                fired_at = Some(frame);
                break;
            }
        }
        assert_eq!(fired_at, Some(NAVIGATION_DWELL as usize - 2));
    }

    #[test]
    fn navigation_disabled_in_whiteboard() {
        let mut d = Debouncer::new();
        let nav = NavContext { enabled: false, ..FREE };
        assert!(hold(&mut d, Gesture::Next, 30, nav).is_empty());
        assert!(!d.is_latched());
    }

    #[test]
    fn navigation_at_deck_edge_fires_nothing() {
        let mut d = Debouncer::new();
        let edge = NavContext { can_advance: false, ..FREE };
        assert!(hold(&mut d, Gesture::Next, 30, edge).is_empty());
        assert_eq!(d.navigation_lock(), 0);
        assert!(d.is_latched());
    }

    #[test]
    fn last_gesture_recorded_during_cooldown() {
        let mut d = Debouncer::new();
        d.step(Gesture::Draw, BELOW, FREE);
        assert_eq!(d.last_gesture(), Some(Gesture::Draw));
        assert_eq!(d.cooldown(), GESTURE_COOLDOWN - 1);
    }
}
