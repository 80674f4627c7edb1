/// Row or column index on the square grid.
pub type Coord = u8;

/// Count type wide enough for every cell of the largest (255×255) grid.
pub type CellCount = u16;

/// Grid position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Milliseconds, either since the UNIX epoch or as an elapsed span.
pub type TimeMs = u64;

/// `ndarray` index for a grid position.
pub(crate) const fn nd(coords: Coord2) -> [usize; 2] {
    [coords.0 as usize, coords.1 as usize]
}

const NEIGHBOR_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The up-to-8 in-bounds neighbors of `center` on an `n`-by-`n` grid, in
/// row-major order. There is no wraparound: edge cells simply yield fewer
/// positions. The iterator is finite and restartable (call again for a fresh
/// pass).
pub fn neighbors(center: Coord2, n: Coord) -> impl Iterator<Item = Coord2> {
    let side = n as i16;
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let row = center.0 as i16 + dr;
        let col = center.1 as i16 + dc;
        if (0..side).contains(&row) && (0..side).contains(&col) {
            Some((row as Coord, col as Coord))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let all: Vec<_> = neighbors((4, 4), 9).collect();
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(4, 4)));
    }

    #[test]
    fn corner_and_edge_cells_yield_fewer_positions() {
        assert_eq!(neighbors((0, 0), 9).count(), 3);
        assert_eq!(neighbors((0, 4), 9).count(), 5);
        assert_eq!(neighbors((8, 8), 9).count(), 3);
    }

    #[test]
    fn one_by_one_grid_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), 1).count(), 0);
    }

    #[test]
    fn all_neighbors_are_chebyshev_distance_one() {
        for pos in neighbors((3, 5), 9) {
            let dr = pos.0.abs_diff(3);
            let dc = pos.1.abs_diff(5);
            assert_eq!(dr.max(dc), 1);
        }
    }
}
