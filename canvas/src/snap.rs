//! Snap solver: aligns a moving rectangle or edge with stationary candidates.
//!
//! Candidates are rectangles in canvas units, supplied in priority order: the
//! canvas bounds first, then sibling layers in z-order. Each axis
//! snaps independently and at most once; the first candidate within the
//! threshold wins. The solver never mutates anything. Guides it returns are
//! advisory and recomputed on every call.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

/// An axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self { x: left, y: top, width: right - left, height: bottom - top }
    }

    /// Bounding box of a set of rectangles, or `None` when empty.
    pub fn bounding<'a, I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects.into_iter().fold(None, |acc, r| Some(acc.map_or(*r, |b: Rect| b.union(r))))
    }

    /// Returns `true` if the point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// The (low edge, high edge, center) triple along `axis`.
    #[must_use]
    pub fn lines(&self, axis: Axis) -> (f64, f64, f64) {
        match axis {
            Axis::X => (self.left(), self.right(), self.center_x()),
            Axis::Y => (self.top(), self.bottom(), self.center_y()),
        }
    }
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal positions (left/right/center-x).
    X,
    /// Vertical positions (top/bottom/center-y).
    Y,
}

/// An alignment line to draw while a snap is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guide {
    /// A vertical line at canvas x.
    Vertical(f64),
    /// A horizontal line at canvas y.
    Horizontal(f64),
}

impl Guide {
    /// The guide drawn for a snap along `axis` at `position`.
    #[must_use]
    pub fn along(axis: Axis, position: f64) -> Self {
        match axis {
            Axis::X => Self::Vertical(position),
            Axis::Y => Self::Horizontal(position),
        }
    }
}

/// A stationary rectangle a moving geometry can align with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// The canvas itself. Moving edges align only with the same canvas edge.
    Canvas(Rect),
    /// A sibling layer. Moving edges align with either of its edges.
    Layer(Rect),
}

impl Candidate {
    #[must_use]
    pub fn rect(&self) -> &Rect {
        match self {
            Self::Canvas(rect) | Self::Layer(rect) => rect,
        }
    }
}

/// Outcome of a [`solve`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// Offset to add to the moving rectangle's x.
    pub offset_x: f64,
    /// Offset to add to the moving rectangle's y.
    pub offset_y: f64,
    /// At most one guide per axis.
    pub guides: Vec<Guide>,
}

/// Snap a whole moving rectangle against `candidates`.
///
/// Per sibling the pairs are checked in order low↔low, low↔high,
/// high↔high, high↔low, center↔center, where low/high are left/right on the
/// x axis and top/bottom on the y axis. Against the canvas only low↔low,
/// high↔high and center↔center are checked.
#[must_use]
pub fn solve(moving: &Rect, candidates: &[Candidate], threshold: f64) -> SnapResult {
    let mut result = SnapResult::default();
    if let Some((offset, line)) = solve_axis(moving, candidates, threshold, Axis::X) {
        result.offset_x = offset;
        result.guides.push(Guide::along(Axis::X, line));
    }
    if let Some((offset, line)) = solve_axis(moving, candidates, threshold, Axis::Y) {
        result.offset_y = offset;
        result.guides.push(Guide::along(Axis::Y, line));
    }
    result
}

fn solve_axis(moving: &Rect, candidates: &[Candidate], threshold: f64, axis: Axis) -> Option<(f64, f64)> {
    let (lo, hi, mid) = moving.lines(axis);
    for candidate in candidates {
        let (c_lo, c_hi, c_mid) = candidate.rect().lines(axis);
        let same_side = [(lo, c_lo), (hi, c_hi), (mid, c_mid)];
        let any_side = [(lo, c_lo), (lo, c_hi), (hi, c_hi), (hi, c_lo), (mid, c_mid)];
        let pairs: &[(f64, f64)] = match candidate {
            Candidate::Canvas(_) => &same_side,
            Candidate::Layer(_) => &any_side,
        };
        for &(from, to) in pairs {
            if (to - from).abs() < threshold {
                return Some((to - from, to));
            }
        }
    }
    None
}

/// Snap a single moving line (one edge) along `axis`.
///
/// Each candidate contributes its low edge, high edge and center, in that
/// order. Returns the line position snapped to, if any.
#[must_use]
pub fn snap_line(value: f64, axis: Axis, candidates: &[Candidate], threshold: f64) -> Option<f64> {
    candidates.iter().find_map(|candidate| {
        let (c_lo, c_hi, c_mid) = candidate.rect().lines(axis);
        [c_lo, c_hi, c_mid].into_iter().find(|line| (line - value).abs() < threshold)
    })
}
