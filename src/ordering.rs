//! Boundary ordering for the quadrilateral overlay.

use crate::model::{Point, Quad};

/// Order four corners as top-left, top-right, bottom-right, bottom-left.
///
/// The points are split into a left and a right pair by x, and each pair
/// into top and bottom by y. Equal x values are broken by y, so the result
/// depends only on the set of points and not on their input order.
/// Self-intersecting input is not rejected; it yields whatever boundary the
/// split produces.
///
/// Only the overlay uses this order. Stored points keep raw handle order.
pub fn order_points(points: Quad) -> Quad {
    let mut by_x = points;
    by_x.sort_by_key(|p| (p.x, p.y));

    let mut left = [by_x[0], by_x[1]];
    let mut right = [by_x[2], by_x[3]];
    left.sort_by_key(|p| p.y);
    right.sort_by_key(|p| p.y);

    [left[0], right[0], right[1], left[1]]
}

/// The four edges of the ordered boundary: top, right, bottom, left.
pub fn boundary_edges(points: Quad) -> [(Point, Point); 4] {
    let [tl, tr, br, bl] = order_points(points);
    [(tl, tr), (tr, br), (br, bl), (bl, tl)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: Quad = [
        Point::new(50, 50),
        Point::new(750, 50),
        Point::new(750, 550),
        Point::new(50, 550),
    ];

    /// Every permutation of four items, by index.
    fn permutations() -> Vec<[usize; 4]> {
        let mut out = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        let mut seen = [false; 4];
                        idx.iter().for_each(|&i| seen[i] = true);
                        if seen.iter().all(|&s| s) {
                            out.push(idx);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_rectangle_canonical_for_every_input_order() {
        let perms = permutations();
        assert_eq!(perms.len(), 24);
        for idx in perms {
            let input = idx.map(|i| RECT[i]);
            assert_eq!(order_points(input), RECT, "input {:?}", input);
        }
    }

    #[test]
    fn test_order_is_idempotent() {
        let samples: [Quad; 4] = [
            RECT,
            [
                Point::new(10, 90),
                Point::new(300, 5),
                Point::new(20, 10),
                Point::new(280, 240),
            ],
            [
                Point::new(5, 5),
                Point::new(5, 5),
                Point::new(9, 1),
                Point::new(1, 9),
            ],
            // self-intersecting "bow tie"
            [
                Point::new(0, 0),
                Point::new(100, 100),
                Point::new(100, 0),
                Point::new(0, 100),
            ],
        ];
        for quad in samples {
            let once = order_points(quad);
            assert_eq!(order_points(once), once);
        }
    }

    #[test]
    fn test_skewed_quad() {
        let quad = [
            Point::new(280, 240),
            Point::new(20, 10),
            Point::new(300, 5),
            Point::new(10, 90),
        ];
        assert_eq!(
            order_points(quad),
            [
                Point::new(20, 10),
                Point::new(300, 5),
                Point::new(280, 240),
                Point::new(10, 90),
            ]
        );
    }

    #[test]
    fn test_x_tie_across_pairs_is_stable() {
        let quad = [
            Point::new(0, 0),
            Point::new(5, 10),
            Point::new(5, 1),
            Point::new(9, 12),
        ];
        let once = order_points(quad);
        assert_eq!(
            once,
            [
                Point::new(0, 0),
                Point::new(5, 10),
                Point::new(9, 12),
                Point::new(5, 1),
            ]
        );
        assert_eq!(order_points(once), once);

        let mut reversed = quad;
        reversed.reverse();
        assert_eq!(order_points(reversed), once);
    }

    #[test]
    fn test_boundary_edges_close_the_loop() {
        let edges = boundary_edges(RECT);
        assert_eq!(edges[0], (RECT[0], RECT[1]));
        assert_eq!(edges[3], (RECT[3], RECT[0]));
    }
}
