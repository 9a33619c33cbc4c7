//! Marching squares over the contour field.
//!
//! Corner winding: top-left = 8, top-right = 4, bottom-right = 2,
//! bottom-left = 1, rows increasing downward in screen space. Cases 0 and
//! 15 emit nothing; the rest emit one or two linearly interpolated edge
//! segments. The segment buffer is cleared and refilled per level so no
//! allocation survives a frame.

/// One stroked line segment: x1, y1, x2, y2 in canvas px.
pub type Segment = [f32; 4];

/// Corner deltas below this are treated as flat: the crossing falls on the
/// edge midpoint instead of dividing by a vanishing difference.
pub const FLAT_EPSILON: f32 = 1e-4;

#[inline]
fn edge_lerp(a: f32, b: f32, threshold: f32) -> f32 {
    if (b - a).abs() < FLAT_EPSILON {
        0.5
    } else {
        (threshold - a) / (b - a)
    }
}

/// Extract the iso-contour at `threshold` into `segments`.
pub fn marching_squares(
    field: &[f32],
    cols: usize,
    rows: usize,
    cell_size: f32,
    threshold: f32,
    segments: &mut Vec<Segment>,
) {
    segments.clear();
    if cols < 2 || rows < 2 {
        return;
    }

    for j in 0..rows - 1 {
        let row = j * cols;
        let next_row = (j + 1) * cols;
        for i in 0..cols - 1 {
            let tl = field[row + i];
            let tr = field[row + i + 1];
            let br = field[next_row + i + 1];
            let bl = field[next_row + i];

            let config = (u8::from(tl >= threshold) << 3)
                | (u8::from(tr >= threshold) << 2)
                | (u8::from(br >= threshold) << 1)
                | u8::from(bl >= threshold);

            if config == 0 || config == 15 {
                continue;
            }

            let x = i as f32 * cell_size;
            let y = j as f32 * cell_size;

            // crossing points on each of the four cell edges
            let top = x + edge_lerp(tl, tr, threshold) * cell_size;
            let bottom = x + edge_lerp(bl, br, threshold) * cell_size;
            let left = y + edge_lerp(tl, bl, threshold) * cell_size;
            let right = y + edge_lerp(tr, br, threshold) * cell_size;
            let x1 = x + cell_size;
            let y1 = y + cell_size;

            match config {
                1 => segments.push([x, left, bottom, y1]),
                2 => segments.push([bottom, y1, x1, right]),
                3 => segments.push([x, left, x1, right]),
                4 => segments.push([top, y, x1, right]),
                5 => {
                    segments.push([x, left, top, y]);
                    segments.push([bottom, y1, x1, right]);
                }
                6 => segments.push([top, y, bottom, y1]),
                7 => segments.push([x, left, top, y]),
                8 => segments.push([top, y, x, left]),
                9 => segments.push([top, y, bottom, y1]),
                10 => {
                    segments.push([top, y, x1, right]);
                    segments.push([x, left, bottom, y1]);
                }
                11 => segments.push([top, y, x1, right]),
                12 => segments.push([x, left, x1, right]),
                13 => segments.push([bottom, y1, x1, right]),
                14 => segments.push([x, left, bottom, y1]),
                _ => unreachable!(),
            }
        }
    }
}
