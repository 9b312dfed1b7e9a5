//! Integer 2D geometry and the clipping rules every region operation uses.

use alloc::vec::Vec;

/// A position in pixel coordinates. May be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Buffer dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The rectangle `(0, 0)..(width, height)`, saturated to `i32`.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, *self)
    }
}

/// A half-open rectangle `[left, right) × [top, bottom)`.
///
/// A rectangle with `right <= left` or `bottom <= top` is empty. Nothing is
/// normalised on construction; callers may pass any four values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `origin .. origin + size`, saturating at `i32::MAX`.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: saturate(origin.x as i64 + size.width as i64),
            bottom: saturate(origin.y as i64 + size.height as i64),
        }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Width, or 0 for an empty rectangle.
    #[inline]
    pub fn width(&self) -> u32 {
        (self.right as i64 - self.left as i64).max(0) as u32
    }

    /// Height, or 0 for an empty rectangle.
    #[inline]
    pub fn height(&self) -> u32 {
        (self.bottom as i64 - self.top as i64).max(0) as u32
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Overlap of two rectangles; may be empty.
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Shift by `(dx, dy)`, saturating.
    #[inline]
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ---------------------------------------------------------------------------
// Equivalence clip
// ---------------------------------------------------------------------------

/// A clipped source/destination pair in buffer coordinates, ready to index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipSpan {
    pub src_x: usize,
    pub src_y: usize,
    pub dst_x: usize,
    pub dst_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Clip `src_rect` (in source coordinates) placed at `pos` (in destination
/// coordinates) against both buffers.
///
/// Trimming either side moves the other by the same amount, so source pixel
/// `(src_x + i, src_y + j)` always lands on `(dst_x + i, dst_y + j)`.
/// Returns `None` when nothing overlaps.
pub fn clip_pair(src: Size, src_rect: Rect, dst: Size, pos: Point) -> Option<ClipSpan> {
    let s = src_rect.intersect(&src.bounds());
    if s.is_empty() {
        return None;
    }
    // Placement of the clipped source in destination space, in i64 so that
    // extreme offsets cannot overflow.
    let dx0 = pos.x as i64 + (s.left as i64 - src_rect.left as i64);
    let dy0 = pos.y as i64 + (s.top as i64 - src_rect.top as i64);
    let dx1 = dx0 + s.width() as i64;
    let dy1 = dy0 + s.height() as i64;

    let left = dx0.max(0);
    let top = dy0.max(0);
    let right = dx1.min(dst.width as i64);
    let bottom = dy1.min(dst.height as i64);
    if right <= left || bottom <= top {
        return None;
    }
    Some(ClipSpan {
        src_x: (s.left as i64 + (left - dx0)) as usize,
        src_y: (s.top as i64 + (top - dy0)) as usize,
        dst_x: left as usize,
        dst_y: top as usize,
        width: (right - left) as usize,
        height: (bottom - top) as usize,
    })
}

/// Nearest-neighbour index map for one axis of a scaled blit.
///
/// For each destination index `d` inside both `dst_start..dst_start+dst_extent`
/// and `0..dst_limit`, the source index is
/// `src_start + (d - dst_start) * src_extent / dst_extent`. Pairs whose source
/// index falls outside `0..src_limit` are dropped. Empty extents produce an
/// empty map.
pub fn scale_axis(
    src_start: i32,
    src_extent: u32,
    src_limit: usize,
    dst_start: i32,
    dst_extent: u32,
    dst_limit: usize,
) -> Vec<(usize, usize)> {
    if src_extent == 0 || dst_extent == 0 {
        return Vec::new();
    }
    // (d - ds) * se needs 65 bits for full-range rects.
    let (ss, se) = (src_start as i128, src_extent as i128);
    let (ds, de) = (dst_start as i128, dst_extent as i128);
    let lo = ds.max(0);
    let hi = (ds + de).min(dst_limit as i128);
    let mut map = Vec::with_capacity((hi - lo).max(0) as usize);
    for d in lo..hi {
        let s = ss + (d - ds) * se / de;
        if s >= 0 && s < src_limit as i128 {
            map.push((d as usize, s as usize));
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_basics() {
        let r = Rect::new(2, 3, 10, 7);
        assert_eq!(r.width(), 8);
        assert_eq!(r.height(), 4);
        assert!(r.contains(Point::new(2, 3)));
        assert!(!r.contains(Point::new(10, 3)));
        assert!(Rect::new(5, 5, 5, 9).is_empty());
        assert_eq!(Rect::new(5, 0, 1, 1).width(), 0);
    }

    #[test]
    fn rect_intersect_and_translate() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 20, 5);
        assert_eq!(a.intersect(&b), Rect::new(5, 0, 10, 5));
        assert!(a.intersect(&Rect::new(20, 20, 30, 30)).is_empty());
        assert_eq!(
            Rect::new(i32::MAX - 1, 0, i32::MAX, 1).translate(5, 0).left,
            i32::MAX
        );
    }

    #[test]
    fn origin_size_saturates() {
        let r = Rect::from_origin_size(Point::new(i32::MAX - 2, 0), Size::new(u32::MAX, 1));
        assert_eq!(r.right, i32::MAX);
    }

    #[test]
    fn clip_inside() {
        let c = clip_pair(
            Size::new(4, 4),
            Rect::new(0, 0, 4, 4),
            Size::new(10, 10),
            Point::new(3, 2),
        )
        .unwrap();
        assert_eq!(
            c,
            ClipSpan {
                src_x: 0,
                src_y: 0,
                dst_x: 3,
                dst_y: 2,
                width: 4,
                height: 4
            }
        );
    }

    #[test]
    fn clip_negative_placement_moves_source() {
        let c = clip_pair(
            Size::new(4, 4),
            Rect::new(0, 0, 4, 4),
            Size::new(10, 10),
            Point::new(-1, -3),
        )
        .unwrap();
        assert_eq!((c.src_x, c.src_y, c.dst_x, c.dst_y), (1, 3, 0, 0));
        assert_eq!((c.width, c.height), (3, 1));
    }

    #[test]
    fn clip_source_rect_outside_source_moves_destination() {
        let c = clip_pair(
            Size::new(4, 4),
            Rect::new(-2, 1, 3, 9),
            Size::new(10, 10),
            Point::new(0, 0),
        )
        .unwrap();
        assert_eq!((c.src_x, c.src_y, c.dst_x, c.dst_y), (0, 1, 2, 0));
        assert_eq!((c.width, c.height), (3, 3));
    }

    #[test]
    fn clip_far_outside_is_none() {
        let src = Size::new(4, 4);
        let all = Rect::new(0, 0, 4, 4);
        let dst = Size::new(8, 8);
        assert!(clip_pair(src, all, dst, Point::new(8, 0)).is_none());
        assert!(clip_pair(src, all, dst, Point::new(-4, 0)).is_none());
        assert!(clip_pair(src, all, dst, Point::new(i32::MIN, i32::MAX)).is_none());
        assert!(clip_pair(src, Rect::new(4, 4, 9, 9), dst, Point::ORIGIN).is_none());
        assert!(clip_pair(Size::new(0, 0), all, dst, Point::ORIGIN).is_none());
    }

    #[test]
    fn scale_axis_upscale() {
        let m = scale_axis(0, 2, 2, 0, 4, 4);
        assert_eq!(m, [(0, 0), (1, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn scale_axis_downscale() {
        let m = scale_axis(0, 4, 4, 0, 2, 2);
        assert_eq!(m, [(0, 0), (1, 2)]);
    }

    #[test]
    fn scale_axis_clips_both_sides() {
        // destination starts off-buffer; mapped source beyond its limit is dropped
        let m = scale_axis(2, 4, 4, -1, 4, 10);
        assert_eq!(m, [(0, 3)]);
        assert!(scale_axis(0, 0, 4, 0, 4, 4).is_empty());
    }

    #[test]
    fn scale_axis_full_range_rects() {
        let m = scale_axis(i32::MIN, u32::MAX, 2, i32::MIN, u32::MAX, 1000);
        assert_eq!(m, [(0, 0), (1, 1)]);
        let m = scale_axis(0, 2, 2, i32::MIN, u32::MAX, 4);
        assert_eq!(m, [(0, 1), (1, 1), (2, 1), (3, 1)]);
    }
}
