// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored placement of a dropdown body relative to its trigger.
//!
//! The calculator is pure: it takes the trigger's viewport-relative bounding box,
//! the current scroll offset, and the measured body size, and returns page
//! coordinates for the body's top-left corner.
//!
//! Page coordinates are viewport coordinates plus the scroll offset. Alignment then
//! picks a side of the trigger:
//!
//! | align    | top                       | left                      |
//! |----------|---------------------------|---------------------------|
//! | `Top`    | page top − body height    | page left                 |
//! | `Right`  | page top                  | page left + trigger width |
//! | `Bottom` | page top + trigger height | page left                 |
//! | `Left`   | page top                  | page left − body width    |
//!
//! The manual offset is added last, `x` to the left edge and `y` to the top edge.
//!
//! ```
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_dropdown::position::{place, Measurement};
//! use understory_dropdown::Align;
//!
//! let m = Measurement {
//!     trigger: Rect::new(50.0, 100.0, 130.0, 130.0),
//!     body: Size::new(120.0, 60.0),
//!     scroll: Vec2::ZERO,
//! };
//! let p = place(&m, Align::Bottom, Vec2::new(0.0, 4.0));
//! assert_eq!(p.origin, Point::new(50.0, 134.0));
//! assert_eq!(p.trigger_width, 80.0);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::Align;

/// Everything the calculator needs from the host after layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Trigger bounding box in viewport coordinates.
    pub trigger: Rect,
    /// Rendered size of the body panel.
    pub body: Size,
    /// Current scroll offset of the page.
    pub scroll: Vec2,
}

/// Result of a placement computation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Body top-left corner in page coordinates (`x` is left, `y` is top).
    pub origin: Point,
    /// Measured trigger width, so the body can match it.
    pub trigger_width: f64,
}

impl Placement {
    /// Page-space top edge of the body.
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Page-space left edge of the body.
    pub fn left(&self) -> f64 {
        self.origin.x
    }
}

/// Compute the body placement for `align`, then shift it by `offset`.
pub fn place(m: &Measurement, align: Align, offset: Vec2) -> Placement {
    let page = m.trigger.origin() + m.scroll;
    let trigger = m.trigger.size();
    let origin = match align {
        Align::Top => Point::new(page.x, page.y - m.body.height),
        Align::Right => Point::new(page.x + trigger.width, page.y),
        Align::Bottom => Point::new(page.x, page.y + trigger.height),
        Align::Left => Point::new(page.x - m.body.width, page.y),
    };
    Placement {
        origin: origin + offset,
        trigger_width: trigger.width,
    }
}

/// Like [`place`], but tolerates missing measurements.
///
/// Returns `None` when either the trigger or the body could not be measured,
/// which happens when an element unmounts between scheduling and measuring.
pub fn try_place(
    trigger: Option<Rect>,
    body: Option<Size>,
    scroll: Vec2,
    align: Align,
    offset: Vec2,
) -> Option<Placement> {
    let m = Measurement {
        trigger: trigger?,
        body: body?,
        scroll,
    };
    Some(place(&m, align, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Align; 4] = [Align::Top, Align::Right, Align::Bottom, Align::Left];

    fn sample() -> Measurement {
        // top 100, left 50, 80 × 30
        Measurement {
            trigger: Rect::new(50.0, 100.0, 130.0, 130.0),
            body: Size::new(120.0, 60.0),
            scroll: Vec2::ZERO,
        }
    }

    #[test]
    fn alignment_table() {
        let m = sample();
        let at = |align| place(&m, align, Vec2::ZERO).origin;
        assert_eq!(at(Align::Bottom), Point::new(50.0, 130.0));
        assert_eq!(at(Align::Top), Point::new(50.0, 40.0));
        assert_eq!(at(Align::Right), Point::new(130.0, 100.0));
        assert_eq!(at(Align::Left), Point::new(-70.0, 100.0));
    }

    #[test]
    fn offset_shifts_every_alignment_exactly() {
        let m = sample();
        let offset = Vec2::new(7.0, -3.0);
        for align in ALL {
            let base = place(&m, align, Vec2::ZERO).origin;
            let shifted = place(&m, align, offset).origin;
            assert_eq!(shifted - base, offset, "align {align:?}");
        }
    }

    #[test]
    fn scroll_converts_viewport_to_page() {
        let mut m = sample();
        m.scroll = Vec2::new(10.0, 200.0);
        let p = place(&m, Align::Bottom, Vec2::ZERO);
        assert_eq!(p.origin, Point::new(60.0, 330.0));
        assert_eq!(p.top(), 330.0);
        assert_eq!(p.left(), 60.0);
    }

    #[test]
    fn trigger_width_is_propagated() {
        let p = place(&sample(), Align::Left, Vec2::ZERO);
        assert_eq!(p.trigger_width, 80.0);
    }

    #[test]
    fn missing_elements_skip() {
        let m = sample();
        assert!(try_place(None, Some(m.body), m.scroll, Align::Bottom, Vec2::ZERO).is_none());
        assert!(try_place(Some(m.trigger), None, m.scroll, Align::Bottom, Vec2::ZERO).is_none());
        assert_eq!(
            try_place(Some(m.trigger), Some(m.body), m.scroll, Align::Top, Vec2::ZERO),
            Some(place(&m, Align::Top, Vec2::ZERO))
        );
    }
}
