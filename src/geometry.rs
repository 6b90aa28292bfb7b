//! Pixel-set geometry: connected components, boundary tracing, convex hulls
//! and minimum-area rectangle orientation.
//!
//! "Contours" of an ink mask are its 8-connected components; a component's
//! area is its pixel count and its orientation comes from the minimum-area
//! rectangle of its convex hull. Boundary tracing produces the ordered point
//! sequence the curvature measurements need.

use crate::image::GrayImageU8;

/// Integer pixel coordinate (x right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned bounding box in pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// One 8-connected ink component.
#[derive(Clone, Debug)]
pub struct Component {
    /// All ink pixels of the component, in scan order.
    pub points: Vec<PixelPoint>,
    pub bbox: BoundingBox,
}

impl Component {
    /// Component area in pixels.
    #[inline]
    pub fn area(&self) -> usize {
        self.points.len()
    }
}

/// 8-neighborhood offsets in clockwise order starting west (y points down).
const NEIGHBORS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Label the 8-connected ink components of a mask.
pub fn connected_components(mask: &GrayImageU8) -> Vec<Component> {
    let (w, h) = (mask.w as i32, mask.h as i32);
    let mut visited = vec![false; mask.w * mask.h];
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if visited[idx] || mask.get(x as usize, y as usize) == 0 {
                continue;
            }
            visited[idx] = true;
            stack.push(PixelPoint { x, y });
            let mut points = Vec::new();
            let (mut x0, mut y0, mut x1, mut y1) = (x, y, x, y);
            while let Some(p) = stack.pop() {
                points.push(p);
                x0 = x0.min(p.x);
                y0 = y0.min(p.y);
                x1 = x1.max(p.x);
                y1 = y1.max(p.y);
                for (dx, dy) in NEIGHBORS {
                    let (nx, ny) = (p.x + dx, p.y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let nidx = (ny * w + nx) as usize;
                    if !visited[nidx] && mask.get(nx as usize, ny as usize) > 0 {
                        visited[nidx] = true;
                        stack.push(PixelPoint { x: nx, y: ny });
                    }
                }
            }
            components.push(Component {
                points,
                bbox: BoundingBox {
                    x: x0,
                    y: y0,
                    w: x1 - x0 + 1,
                    h: y1 - y0 + 1,
                },
            });
        }
    }
    components
}

/// Trace the outer boundary of every component as an ordered point sequence
/// (Moore-neighbor tracing with Jacob's stopping criterion). One-pixel-wide
/// strokes yield an out-and-back walk along the stroke, which is exactly
/// what the turning-angle measurements expect.
pub fn trace_boundaries(mask: &GrayImageU8) -> Vec<Vec<PixelPoint>> {
    connected_components(mask)
        .iter()
        .map(|c| {
            let start = scan_order_first(&c.points);
            trace_from(mask, start, c.area())
        })
        .collect()
}

fn scan_order_first(points: &[PixelPoint]) -> PixelPoint {
    let mut best = points[0];
    for &p in &points[1..] {
        if (p.y, p.x) < (best.y, best.x) {
            best = p;
        }
    }
    best
}

fn trace_from(mask: &GrayImageU8, start: PixelPoint, component_area: usize) -> Vec<PixelPoint> {
    let ink = |p: PixelPoint| -> bool {
        p.x >= 0
            && p.y >= 0
            && (p.x as usize) < mask.w
            && (p.y as usize) < mask.h
            && mask.get(p.x as usize, p.y as usize) > 0
    };

    let mut boundary = vec![start];
    let mut p = start;
    // The west neighbor of the scan-order first pixel is background.
    let mut backtrack_dir = 0usize;
    let initial_state = (start, backtrack_dir);
    let cap = 8 * component_area + 8;

    for _ in 0..cap {
        let mut found = None;
        for k in 1..=8 {
            let dir = (backtrack_dir + k) % 8;
            let q = PixelPoint {
                x: p.x + NEIGHBORS[dir].0,
                y: p.y + NEIGHBORS[dir].1,
            };
            if ink(q) {
                found = Some((dir, q));
                break;
            }
        }
        let Some((dir, q)) = found else {
            break; // isolated pixel
        };
        // Backtrack for the next step is the current pixel, seen from q.
        let next_backtrack = (dir + 4) % 8;
        if (q, next_backtrack) == initial_state {
            break;
        }
        boundary.push(q);
        p = q;
        backtrack_dir = next_backtrack;
    }
    boundary
}

/// Convex hull via Andrew's monotone chain. Returns the hull in
/// counter-clockwise order (y down); collinear points are dropped.
pub fn convex_hull(points: &[PixelPoint]) -> Vec<PixelPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut pts = points.to_vec();
    pts.sort_by_key(|p| (p.x, p.y));
    pts.dedup();

    let cross = |o: PixelPoint, a: PixelPoint, b: PixelPoint| -> i64 {
        (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
    };

    let mut hull: Vec<PixelPoint> = Vec::with_capacity(pts.len() * 2);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev() {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Orientation of the minimum-area bounding rectangle of a point set,
/// in degrees mapped into (-45, 45]. Returns 0 for degenerate sets.
pub fn min_area_rect_angle(points: &[PixelPoint]) -> f32 {
    let hull = convex_hull(points);
    match hull.len() {
        0 | 1 => return 0.0,
        2 => {
            let dx = (hull[1].x - hull[0].x) as f32;
            let dy = (hull[1].y - hull[0].y) as f32;
            return map_to_quarter(dy.atan2(dx).to_degrees());
        }
        _ => {}
    }

    let mut best_area = f32::INFINITY;
    let mut best_angle = 0.0f32;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let (ex, ey) = ((b.x - a.x) as f32, (b.y - a.y) as f32);
        let len = (ex * ex + ey * ey).sqrt();
        if len < 1e-6 {
            continue;
        }
        let (ux, uy) = (ex / len, ey / len);
        let (mut min_u, mut max_u) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f32::INFINITY, f32::NEG_INFINITY);
        for &p in &hull {
            let (px, py) = (p.x as f32, p.y as f32);
            let u = px * ux + py * uy;
            let v = -px * uy + py * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let area = (max_u - min_u) * (max_v - min_v);
        if area < best_area {
            best_area = area;
            best_angle = uy.atan2(ux).to_degrees();
        }
    }
    map_to_quarter(best_angle)
}

/// Map an arbitrary rectangle-edge angle into (-45, 45] degrees. The
/// rectangle is 90°-symmetric, so this picks the representative closest to
/// the horizontal axis.
pub fn map_to_quarter(angle_deg: f32) -> f32 {
    let mut a = angle_deg.rem_euclid(90.0);
    if a > 45.0 {
        a -= 90.0;
    }
    a
}
