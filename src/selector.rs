//! Bounded range selection with an independent scrub cursor.
//!
//! A `RangeSelector` owns three integer values over one closed interval: a
//! lower and upper bound that delimit a playable window, and a cursor that
//! scrubs freely across the whole axis. The component is deliberately
//! toolkit-agnostic: it knows nothing about terminals or widgets, only about
//! an axis of a given length in abstract units (cells, pixels). The host
//! feeds it pointer coordinates through the `begin_drag`/`drag_to`/`end_drag`
//! protocol and renders markers wherever `offset_for` says they are.
//!
//! Setters report changes by returning a [`SelectorChange`]; an unchanged
//! (post-clamp) value returns `None`, so callers can wire notifications
//! straight to side effects like seeking an audio engine without de-duping.

use std::error::Error;
use std::fmt;

/// Marker width/height along the primary axis, in axis units. Also the hit
/// region: a press within half a diameter of a marker grabs it.
const HANDLE_DIAMETER: f64 = 3.0;

/// Axis direction of the selector; the host picks which pointer coordinate
/// to feed (`x` for horizontal, `y` for vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One of the three draggable markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Lower,
    Upper,
    Cursor,
}

/// A value change reported by a setter or drag step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorChange {
    Lower(i64),
    Upper(i64),
    Cursor(i64),
}

impl SelectorChange {
    /// The new value, regardless of which marker moved.
    pub fn value(&self) -> i64 {
        match self {
            SelectorChange::Lower(v) | SelectorChange::Upper(v) | SelectorChange::Cursor(v) => *v,
        }
    }
}

/// Rejected `set_range` call: the supplied minimum exceeds the maximum.
/// The selector keeps its previous valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub minimum: i64,
    pub maximum: i64,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid range: minimum {} exceeds maximum {}",
            self.minimum, self.maximum
        )
    }
}

impl Error for InvalidRangeError {}

/// Three draggable values over a closed integer interval.
#[derive(Debug, Clone)]
pub struct RangeSelector {
    orientation: Orientation,
    minimum: i64,
    maximum: i64,
    lower: i64,
    upper: i64,
    cursor: i64,
    active: Option<Handle>,
    axis_length: f64,
}

impl RangeSelector {
    /// New selector over the default 0..=100 interval with the full window
    /// selected and the cursor centered.
    pub fn new(orientation: Orientation) -> Self {
        let (minimum, maximum) = (0, 100);
        Self {
            orientation,
            minimum,
            maximum,
            lower: minimum,
            upper: maximum,
            cursor: (minimum + maximum) / 2,
            active: None,
            axis_length: 0.0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    pub fn lower_value(&self) -> i64 {
        self.lower
    }

    pub fn upper_value(&self) -> i64 {
        self.upper
    }

    pub fn cursor_value(&self) -> i64 {
        self.cursor
    }

    /// The marker currently being dragged, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    pub fn axis_length(&self) -> f64 {
        self.axis_length
    }

    pub fn handle_diameter(&self) -> f64 {
        HANDLE_DIAMETER
    }

    /// Tell the selector how long its axis currently is. Called by the host
    /// on every layout pass; marker geometry is recomputed from values on
    /// demand, so there is no stored position to migrate.
    pub fn set_axis_length(&mut self, length: f64) {
        self.axis_length = length.max(0.0);
    }

    /// Usable track length: the axis minus one handle diameter, so markers
    /// at the extremes sit flush with the ends instead of clipping past
    /// them. Floored at 1 to keep the mapping defined at zero size.
    fn track_length(&self) -> f64 {
        (self.axis_length - HANDLE_DIAMETER).max(1.0)
    }

    /// Axis offset of the marker for `value`.
    pub fn offset_for(&self, value: i64) -> f64 {
        let half = HANDLE_DIAMETER / 2.0;
        let span = (self.maximum - self.minimum) as f64;
        if span <= 0.0 {
            return half;
        }
        half + (value - self.minimum) as f64 / span * self.track_length()
    }

    /// Candidate value for a pointer coordinate. The coordinate is clamped
    /// into `[0, axis_length]` first; the result may still fall slightly
    /// outside the interval (presses inside the end margins) and is clamped
    /// by whichever setter consumes it.
    pub fn value_at(&self, position: f64) -> i64 {
        let p = position.clamp(0.0, self.axis_length);
        let span = (self.maximum - self.minimum) as f64;
        let ratio = (p - HANDLE_DIAMETER / 2.0) / self.track_length();
        (ratio * span).round() as i64 + self.minimum
    }

    /// Reset the interval bounds, clamping all three values into the new
    /// range. Ordering between lower and upper survives because clamping is
    /// monotonic. Fails without touching any state when `minimum > maximum`.
    pub fn set_range(&mut self, minimum: i64, maximum: i64) -> Result<(), InvalidRangeError> {
        if minimum > maximum {
            return Err(InvalidRangeError { minimum, maximum });
        }
        self.minimum = minimum;
        self.maximum = maximum;
        self.lower = self.lower.clamp(minimum, maximum);
        self.upper = self.upper.clamp(minimum, maximum);
        self.cursor = self.cursor.clamp(minimum, maximum);
        Ok(())
    }

    /// Move the lower bound. The value is clamped to `[minimum, upper]`, so
    /// the window can collapse to a point but the bounds never swap.
    pub fn set_lower(&mut self, value: i64) -> Option<SelectorChange> {
        let value = value.clamp(self.minimum, self.upper);
        if value == self.lower {
            return None;
        }
        self.lower = value;
        Some(SelectorChange::Lower(value))
    }

    /// Move the upper bound, clamped to `[lower, maximum]`.
    pub fn set_upper(&mut self, value: i64) -> Option<SelectorChange> {
        let value = value.clamp(self.lower, self.maximum);
        if value == self.upper {
            return None;
        }
        self.upper = value;
        Some(SelectorChange::Upper(value))
    }

    /// Move the cursor, clamped to the full interval. The cursor has no
    /// ordering relation to the window and may sit outside it.
    pub fn set_cursor(&mut self, value: i64) -> Option<SelectorChange> {
        let value = value.clamp(self.minimum, self.maximum);
        if value == self.cursor {
            return None;
        }
        self.cursor = value;
        Some(SelectorChange::Cursor(value))
    }

    /// Start a drag gesture: grab the nearest marker within half a handle
    /// diameter of the pointer. A press over empty track grabs nothing, and
    /// later `drag_to` calls stay inert until the next press. On an exact
    /// distance tie the cursor wins, then the upper bound; the cursor is the
    /// thinnest target visually, so it gets first claim.
    pub fn begin_drag(&mut self, position: f64) -> Option<Handle> {
        let p = position.clamp(0.0, self.axis_length);
        let radius = HANDLE_DIAMETER / 2.0;
        let candidates = [
            (Handle::Cursor, self.offset_for(self.cursor)),
            (Handle::Upper, self.offset_for(self.upper)),
            (Handle::Lower, self.offset_for(self.lower)),
        ];

        let mut best: Option<(Handle, f64)> = None;
        for (handle, offset) in candidates {
            let distance = (p - offset).abs();
            if distance <= radius && best.is_none_or(|(_, d)| distance < d) {
                best = Some((handle, distance));
            }
        }

        self.active = best.map(|(handle, _)| handle);
        self.active
    }

    /// Continue a drag gesture: map the pointer to a candidate value and
    /// route it through the active marker's setter, inheriting that setter's
    /// clamp rule. A no-op when no marker is active.
    pub fn drag_to(&mut self, position: f64) -> Option<SelectorChange> {
        let handle = self.active?;
        let value = self.value_at(position);
        match handle {
            Handle::Lower => self.set_lower(value),
            Handle::Upper => self.set_upper(value),
            Handle::Cursor => self.set_cursor(value),
        }
    }

    /// Finish the gesture. Safe to call repeatedly.
    pub fn end_drag(&mut self) {
        self.active = None;
    }
}
