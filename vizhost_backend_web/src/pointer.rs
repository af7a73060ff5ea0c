// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer positions relative to an element.

use kurbo::{Point, Rect};
use web_sys::{Element, MouseEvent};

/// Maps a client-space point into `rect`, as fractions of its size.
///
/// `(0, 0)` is the top-left corner and `(1, 1)` the bottom-right; points
/// outside the rectangle fall outside that range. An empty rectangle maps
/// everything to the origin.
#[must_use]
pub fn normalize(client: Point, rect: Rect) -> Point {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Point::ORIGIN;
    }
    Point::new(
        (client.x - rect.x0) / rect.width(),
        (client.y - rect.y0) / rect.height(),
    )
}

/// Pointer position of `event` over `target`, normalized with [`normalize`].
#[must_use]
pub fn pointer_position(target: &Element, event: &MouseEvent) -> Point {
    let bb = target.get_bounding_client_rect();
    let rect = Rect::new(bb.left(), bb.top(), bb.right(), bb.bottom());
    normalize(
        Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        rect,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_one_half() {
        let rect = Rect::new(100.0, 50.0, 356.0, 306.0);
        assert_eq!(normalize(Point::new(228.0, 178.0), rect), Point::new(0.5, 0.5));
        assert_eq!(normalize(Point::new(100.0, 50.0), rect), Point::ORIGIN);
    }

    #[test]
    fn empty_rect_maps_to_origin() {
        let rect = Rect::new(10.0, 10.0, 10.0, 40.0);
        assert_eq!(normalize(Point::new(12.0, 20.0), rect), Point::ORIGIN);
    }
}
