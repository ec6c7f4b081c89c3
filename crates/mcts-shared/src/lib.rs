#![no_std]

//! Grid helpers shared by the gravity-game implementations.
//!
//! Boards are flat slices stored column-major: the cell at column `x`, row
//! `y` lives at index `x * height + y`, with row 0 at the bottom.

/// Direction steps for the four line axes: vertical, horizontal and the two
/// diagonals. The first two are always checked, the diagonals only when the
/// rules allow them.
pub const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Index of cell (`x`, `y`) in a column-major board of the given height.
#[inline]
pub fn cell_index(x: usize, y: usize, height: usize) -> usize {
    x * height + y
}

/// Counts how many consecutive cells equal to the anchor cell lie on the
/// line through (`x`, `y`) along `step`, looking both ways.
///
/// The anchor itself counts as one. Each direction stops at the board edge,
/// at the first different cell, or after `limit` steps.
pub fn anchored_run<T: PartialEq>(
    board: &[T],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    step: (i32, i32),
    limit: usize,
) -> usize {
    let anchor = &board[cell_index(x, y, height)];
    let mut run = 1;

    for sign in [1i32, -1] {
        let (dx, dy) = (step.0 * sign, step.1 * sign);
        let (mut cx, mut cy) = (x as i32 + dx, y as i32 + dy);
        let mut taken = 0;
        while taken < limit
            && cx >= 0
            && cy >= 0
            && (cx as usize) < width
            && (cy as usize) < height
            && board[cell_index(cx as usize, cy as usize, height)] == *anchor
        {
            run += 1;
            taken += 1;
            cx += dx;
            cy += dy;
        }
    }

    run
}

/// Checks whether the cell at (`x`, `y`) sits on a line of at least
/// `line_size` equal cells.
///
/// # Arguments
/// * `board` - The board data as a flat column-major slice
/// * `width` - Number of columns
/// * `height` - Number of rows
/// * `line_size` - Number of consecutive pieces needed to win
/// * `diagonals` - Whether the two diagonal axes count
pub fn completes_line<T: PartialEq>(
    board: &[T],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    line_size: usize,
    diagonals: bool,
) -> bool {
    let axes = if diagonals { &AXES[..] } else { &AXES[..2] };
    axes.iter().any(|&step| {
        anchored_run(board, width, height, x, y, step, line_size) >= line_size
    })
}
