use crate::nails::Nail;

/// Anti-aliased rasterization of the segment between two nails.
///
/// Returns `(row, col, coverage)` triples with coverage in `(0.0, 1.0]`,
/// one or two pixels per step along the major axis (Wu's algorithm).
/// Pixels outside `shape` are dropped. Endpoints are canonicalized before
/// walking, so `aa_line(a, b)` and `aa_line(b, a)` touch the identical pixel set.
pub fn aa_line(a: Nail, b: Nail, shape: (usize, usize)) -> Vec<(usize, usize, f32)> {
    let (a, b) = canonical(a, b);
    let (r0, c0) = (a.0 as i64, a.1 as i64);
    let (r1, c1) = (b.0 as i64, b.1 as i64);

    let steep = (r1 - r0).abs() > (c1 - c0).abs();
    // transpose steep lines so the walk always follows the major axis
    let (mut x0, mut y0, mut x1, mut y1) = match steep {
        true => (r0, c0, r1, c1),
        false => (c0, r0, c1, r1),
    };
    if x0 > x1 {
        (x0, x1) = (x1, x0);
        (y0, y1) = (y1, y0);
    }

    let dx = x1 - x0;
    let gradient = match dx {
        0 => 0.0,
        _ => (y1 - y0) as f32 / dx as f32,
    };

    let mut covered = Vec::with_capacity(2 * (dx as usize + 1));
    let mut push = |x: i64, y: i64, coverage: f32| {
        let (row, col) = match steep {
            true => (x, y),
            false => (y, x),
        };
        if coverage > 0.0
            && row >= 0
            && col >= 0
            && row < shape.0 as i64
            && col < shape.1 as i64
        {
            covered.push((row as usize, col as usize, coverage));
        }
    };

    let mut y = y0 as f32;
    for x in x0..=x1 {
        let y_floor = y.floor();
        let frac = y - y_floor;
        push(x, y_floor as i64, 1.0 - frac);
        push(x, y_floor as i64 + 1, frac);
        y += gradient;
    }

    covered
}

/// The 8-connected integer pixel path between two nails (Bresenham),
/// in order from `a` to `b`, without duplicates.
///
/// Pixels outside `shape` are dropped. The path is computed over canonical
/// endpoints and reversed when needed, so `walk_line(a, b)` and
/// `walk_line(b, a)` cover the identical pixel set.
pub fn walk_line(a: Nail, b: Nail, shape: (usize, usize)) -> Vec<(usize, usize)> {
    let (start, end) = canonical(a, b);
    let reversed = start != a;

    let (mut r, mut c) = (start.0 as i64, start.1 as i64);
    let (r1, c1) = (end.0 as i64, end.1 as i64);

    let dr = (r1 - r).abs();
    let dc = (c1 - c).abs();
    let sr = if r < r1 { 1 } else { -1 };
    let sc = if c < c1 { 1 } else { -1 };
    let mut err = dc - dr;

    let mut path = Vec::with_capacity((dr + dc) as usize + 1);
    loop {
        if r >= 0 && c >= 0 && r < shape.0 as i64 && c < shape.1 as i64 {
            path.push((r as usize, c as usize));
        }
        if r == r1 && c == c1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dr {
            err -= dr;
            c += sc;
        }
        if e2 < dc {
            err += dc;
            r += sr;
        }
    }

    if reversed {
        path.reverse();
    }
    path
}

/// Fixed endpoint order, so both walk directions rasterize the same pixels.
fn canonical(a: Nail, b: Nail) -> (Nail, Nail) {
    if (b.0, b.1) < (a.0, a.1) { (b, a) } else { (a, b) }
}
