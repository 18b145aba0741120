use crate::chart::range::Range;

/// Spreading contacts past this ratio steps one range narrower.
pub const ZOOM_IN_RATIO: f64 = 1.35;
/// Pinching contacts below this ratio steps one range wider.
pub const ZOOM_OUT_RATIO: f64 = 0.72;

/// A two-contact pointer position in any pixel-like coordinate space.
pub type Contact = (f64, f64);

/// Pinch-to-zoom state machine mapping inter-contact distance changes to
/// range steps.
///
/// The gesture starts when two contacts appear, recording the initial
/// distance and the active range. Each successful step re-references both,
/// so successive steps need comparable incremental motion rather than
/// cumulative motion from the gesture's start.
#[derive(Debug, Default)]
pub struct PinchTracker {
    state: Option<PinchState>,
}

#[derive(Debug)]
struct PinchState {
    ref_dist: f64,
    range: Range,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking when exactly two contacts are down.
    pub fn touch_start(&mut self, contacts: &[Contact], current_range: Range) {
        if contacts.len() == 2 {
            self.state = Some(PinchState {
                ref_dist: contact_distance(contacts),
                range: current_range,
            });
        }
    }

    /// Feed a contact update; returns the new range when the gesture
    /// crosses a step threshold.
    pub fn touch_move(&mut self, contacts: &[Contact]) -> Option<Range> {
        if contacts.len() != 2 {
            return None;
        }
        let state = self.state.as_mut()?;
        let dist = contact_distance(contacts);
        if state.ref_dist <= 0.0 {
            return None;
        }

        let ratio = dist / state.ref_dist;
        let next = if ratio > ZOOM_IN_RATIO {
            state.range.narrower()
        } else if ratio < ZOOM_OUT_RATIO {
            state.range.wider()
        } else {
            return None;
        };

        // Saturated at an end of the scale: keep the old reference so a
        // reversal still measures from the original grip.
        if next == state.range {
            return None;
        }

        state.ref_dist = dist;
        state.range = next;
        Some(next)
    }

    /// Contacts lifted, or the underlying data identity changed.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }
}

fn contact_distance(contacts: &[Contact]) -> f64 {
    let (x0, y0) = contacts[0];
    let (x1, y1) = contacts[1];
    (x1 - x0).hypot(y1 - y0)
}
