use nalgebra::{DMatrix, Scalar};
use num_traits::{Bounded, NumCast, Signed};
use thiserror::Error;

/// Scalar types the solver accepts as edge weights.
///
/// Weights must be signed because column potentials go negative while the
/// row potentials climb. Integers and floats both qualify.
pub trait Cost: Scalar + Copy + Signed + Bounded + NumCast + PartialOrd {}

impl<T> Cost for T where T: Scalar + Copy + Signed + Bounded + NumCast + PartialOrd {}

/// Largest cost magnitude an `n`-by-`n` solve accepts.
///
/// Potentials stay within a few multiples of `n` times the largest cost, so
/// `max_value / (8 * (n + 1))` leaves the reduced-cost arithmetic room to spare.
pub fn cost_limit<T: Cost>(n: usize) -> Option<T> {
    let divisor = n.checked_add(1)?.checked_mul(8)?;
    <T as NumCast>::from(divisor).map(|d| T::max_value() / d)
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolveError {
    #[error("malformed cost matrix: row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed cost matrix: entry ({row}, {col}) is not comparable")]
    IncomparableCost { row: usize, col: usize },
    #[error("cost at ({row}, {col}) is too large to solve a {size}x{size} matrix safely")]
    CostOutOfRange { row: usize, col: usize, size: usize },
    #[error("no assignment possible over a {rows}x{cols} cost matrix")]
    Infeasible { rows: usize, cols: usize },
}

impl SolveError {
    /// True for the errors caused by a broken matrix rather than empty input.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            SolveError::RaggedRow { .. }
                | SolveError::IncomparableCost { .. }
                | SolveError::CostOutOfRange { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    row: usize,
    col: usize,
}

impl Allocation {
    pub fn assignment(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

/// Result of a solve: one allocation per matched row, ordered by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocations {
    rows: usize,
    cols: usize,
    allocations: Vec<Allocation>,
}

impl Allocations {
    pub fn assignment(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.allocations.iter().map(Allocation::assignment)
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Every row and every column is matched.
    pub fn is_perfect(&self) -> bool {
        self.rows == self.cols && self.allocations.len() == self.rows
    }

    pub fn col_for(&self, row: usize) -> Option<usize> {
        self.allocations
            .binary_search_by_key(&row, |a| a.row)
            .ok()
            .map(|i| self.allocations[i].col)
    }

    pub fn total_cost<T: Cost>(&self, costs: &DMatrix<T>) -> T {
        self.assignment()
            .map(|a| costs[a])
            .fold(T::zero(), |acc, c| acc + c)
    }
}

/// Minimum-cost matching between the rows and columns of `costs`.
///
/// Square matrices get a perfect matching. Rectangular ones are padded
/// with zero-cost dummies up to square, and the dummy pairs are dropped,
/// leaving a minimum-cost matching of size `min(rows, cols)`.
///
/// Entries larger in magnitude than [`cost_limit`] for the padded size,
/// including float infinities, are rejected instead of risking overflow.
pub fn hungarian<T: Cost>(costs: &DMatrix<T>) -> Result<Allocations, SolveError> {
    let (h, w) = costs.shape();
    if h == 0 || w == 0 {
        return Err(SolveError::Infeasible { rows: h, cols: w });
    }

    let n = h.max(w);
    let limit = cost_limit::<T>(n);
    for row in 0..h {
        for col in 0..w {
            let c = &costs[(row, col)];
            if c.partial_cmp(c).is_none() {
                return Err(SolveError::IncomparableCost { row, col });
            }
            if limit.map_or(true, |limit| *c > limit || *c < -limit) {
                return Err(SolveError::CostOutOfRange { row, col, size: n });
            }
        }
    }

    tracing::debug!(rows = h, cols = w, padded = n, "solving assignment");

    let row_to_col = if h == w {
        solve_square(costs).row_to_col
    } else {
        let mut square = DMatrix::<T>::zeros(n, n);
        square.view_mut((0, 0), (h, w)).copy_from(costs);
        solve_square(&square).row_to_col
    };

    let allocations = row_to_col
        .into_iter()
        .enumerate()
        .filter(|&(row, col)| row < h && col < w)
        .map(|(row, col)| Allocation { row, col })
        .collect();

    Ok(Allocations {
        rows: h,
        cols: w,
        allocations,
    })
}

/// Same as [`hungarian`], for a row-major nested vector.
pub fn hungarian_rows<T: Cost>(rows: &[Vec<T>]) -> Result<Allocations, SolveError> {
    let h = rows.len();
    let w = rows.first().map_or(0, Vec::len);
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != w) {
        return Err(SolveError::RaggedRow {
            row,
            expected: w,
            found: r.len(),
        });
    }

    let costs = DMatrix::from_fn(h, w, |r, c| rows[r][c]);
    hungarian(&costs)
}

struct Solution<T> {
    row_to_col: Vec<usize>,
    #[cfg_attr(not(test), allow(dead_code))]
    row_potential: Vec<T>,
    #[cfg_attr(not(test), allow(dead_code))]
    col_potential: Vec<T>,
}

// Shortest augmenting path over reduced costs c(i, j) - u(i) - v(j).
// Index 0 of the column arrays is a virtual column that anchors the row
// being inserted; real rows and columns are shifted up by one.
fn solve_square<T: Cost>(costs: &DMatrix<T>) -> Solution<T> {
    let n = costs.nrows();
    let inf = T::max_value();

    let mut u = vec![T::zero(); n + 1];
    let mut v = vec![T::zero(); n + 1];
    // owner[j]: row matched to column j, 0 when free
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];
    let mut min_slack = vec![inf; n + 1];
    let mut used = vec![false; n + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0;
        min_slack.fill(inf);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = inf;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = costs[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < min_slack[j] {
                    min_slack[j] = reduced;
                    way[j] = j0;
                }
                // strict comparison keeps the lowest column on ties
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] = u[owner[j]] + delta;
                    v[j] = v[j] - delta;
                } else {
                    min_slack[j] = min_slack[j] - delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // flip the alternating path back to the virtual column
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
        tracing::trace!(row = i - 1, "augmented");
    }

    let mut row_to_col = vec![0usize; n];
    for j in 1..=n {
        row_to_col[owner[j] - 1] = j - 1;
    }

    Solution {
        row_to_col,
        row_potential: u[1..].to_vec(),
        col_potential: v[1..].to_vec(),
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{DMatrix, Matrix2, Matrix4, Matrix5};

    use super::*;

    fn assert_costs(costs: &DMatrix<f64>, assignments: &Allocations, cost_expected: f64) {
        let total = assignments.total_cost(costs);
        assert!(
            (total - cost_expected).abs() < f64::EPSILON,
            "expected {cost_expected}, got {total}"
        );
    }

    fn dynamic<const N: usize>(m: nalgebra::SMatrix<f64, N, N>) -> DMatrix<f64> {
        DMatrix::from_iterator(N, N, m.iter().copied())
    }

    #[test]
    fn basic_two() {
        #[rustfmt::skip]
        let costs = dynamic(Matrix2::from_row_slice(
            &[
                1., 2.,
                2., 1.,
            ]
        ));
        let assignments = hungarian(&costs).unwrap();
        assert!(assignments.is_perfect());
        assert_costs(&costs, &assignments, 2.);
    }

    #[test]
    fn basic_two_rev() {
        #[rustfmt::skip]
        let costs = dynamic(Matrix2::from_row_slice(
            &[
                1., 2.,
                2., 100.
            ]
        ));
        let assignments = hungarian(&costs).unwrap();
        assert_costs(&costs, &assignments, 4.);
        assert_eq!(assignments.col_for(0), Some(1));
        assert_eq!(assignments.col_for(1), Some(0));
    }

    #[test]
    fn basic_four() {
        #[rustfmt::skip]
        let costs = dynamic(Matrix4::from_row_slice(
            &[
                82., 83., 69., 92.,
                77., 37., 49., 92.,
                11., 69.,  5., 86.,
                 8.,  9., 98., 23.,
            ]
        ));
        let assignments = hungarian(&costs).unwrap();
        assert_costs(&costs, &assignments, 140.);
    }

    #[test]
    fn basic_five() {
        #[rustfmt::skip]
        let costs = dynamic(Matrix5::from_row_slice(
            &[
                10., 5.,13.,15.,16.,
                 3., 9.,18.,13., 6.,
                10., 7., 2., 2., 2.,
                 7.,11., 9., 7.,12.,
                 7., 9.,10., 4.,12.,
            ]
        ));
        let assignments = hungarian(&costs).unwrap();
        assert_costs(&costs, &assignments, 23.);
    }

    #[test]
    fn basic_five_2() {
        #[rustfmt::skip]
        let costs = dynamic(Matrix5::from_row_slice(
            &[
                20., 15., 18., 20., 25.,
                18., 20., 12., 14., 15.,
                21., 23., 25., 27., 25.,
                17., 18., 21., 23., 20.,
                18., 18., 16., 19., 20.,
            ]
        ));
        let assignments = hungarian(&costs).unwrap();
        assert_costs(&costs, &assignments, 86.);
    }

    #[test]
    fn integer_costs() {
        let assignments = hungarian_rows(&[vec![0i64, 1], vec![1, 0]]).unwrap();
        assert_eq!(assignments.assignment().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn duals_certify_optimum() {
        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(4, 4, &[
            82i64, 83, 69, 92,
            77, 37, 49, 92,
            11, 69,  5, 86,
             8,  9, 98, 23,
        ]);
        let solution = solve_square(&costs);
        let mut primal = 0;
        for (row, &col) in solution.row_to_col.iter().enumerate() {
            primal += costs[(row, col)];
            // matched edges are tight
            assert_eq!(
                costs[(row, col)],
                solution.row_potential[row] + solution.col_potential[col]
            );
        }
        for row in 0..4 {
            for col in 0..4 {
                assert!(
                    costs[(row, col)] - solution.row_potential[row] - solution.col_potential[col]
                        >= 0
                );
            }
        }
        let dual: i64 = solution.row_potential.iter().sum::<i64>()
            + solution.col_potential.iter().sum::<i64>();
        assert_eq!(primal, dual);
        assert_eq!(primal, 140);
    }

    #[test]
    fn ties_go_to_lowest_column() {
        let costs = DMatrix::from_element(3, 3, 1i32);
        let assignments = hungarian(&costs).unwrap();
        assert_eq!(
            assignments.assignment().collect::<Vec<_>>(),
            vec![(0, 0), (1, 1), (2, 2)]
        );
    }

    #[test]
    fn wide_matrix_leaves_columns_open() {
        let costs = DMatrix::from_row_slice(2, 3, &[5i64, 1, 9, 1, 5, 9]);
        let assignments = hungarian(&costs).unwrap();
        assert!(!assignments.is_perfect());
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments.col_for(0), Some(1));
        assert_eq!(assignments.col_for(1), Some(0));
        assert_eq!(assignments.total_cost(&costs), 2);
    }

    #[test]
    fn tall_matrix_leaves_rows_unmatched() {
        let costs = DMatrix::from_row_slice(3, 2, &[4i64, 4, 0, 7, 7, 0]);
        let assignments = hungarian(&costs).unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments.col_for(0), None);
        assert_eq!(assignments.col_for(1), Some(0));
        assert_eq!(assignments.col_for(2), Some(1));
    }

    #[test]
    fn empty_is_infeasible() {
        let costs = DMatrix::<i64>::zeros(0, 3);
        assert_eq!(
            hungarian(&costs),
            Err(SolveError::Infeasible { rows: 0, cols: 3 })
        );
        assert_eq!(
            hungarian_rows::<i64>(&[]),
            Err(SolveError::Infeasible { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = hungarian_rows(&[vec![1i64, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            SolveError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn costs_at_the_limit_solve_without_overflow() {
        let limit = cost_limit::<i64>(3).unwrap();
        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(3, 3, &[
            -limit,  limit,  limit,
             limit, -limit,  limit,
             limit,  limit, -limit,
        ]);
        let assignments = hungarian(&costs).unwrap();
        assert_eq!(assignments.total_cost(&costs), -3 * limit);

        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(3, 3, &[
            limit, limit,     0,
            limit,     0, limit,
                0, limit, limit,
        ]);
        let assignments = hungarian(&costs).unwrap();
        assert_eq!(
            assignments.assignment().collect::<Vec<_>>(),
            vec![(0, 2), (1, 1), (2, 0)]
        );
    }

    #[test]
    fn oversized_costs_are_rejected() {
        let costs = DMatrix::from_row_slice(2, 2, &[0i64, i64::MAX, 1, 0]);
        let err = hungarian(&costs).unwrap_err();
        assert_eq!(err, SolveError::CostOutOfRange { row: 0, col: 1, size: 2 });
        assert!(err.is_malformed());

        let costs = DMatrix::from_row_slice(2, 2, &[i64::MIN, 0, 0, 0]);
        assert_eq!(
            hungarian(&costs),
            Err(SolveError::CostOutOfRange { row: 0, col: 0, size: 2 })
        );

        // padding counts toward the size the limit is taken for
        let limit = cost_limit::<i64>(3).unwrap();
        let costs = DMatrix::from_row_slice(1, 3, &[limit + 1, 0, 0]);
        assert_eq!(
            hungarian(&costs),
            Err(SolveError::CostOutOfRange { row: 0, col: 0, size: 3 })
        );
    }

    #[test]
    fn infinite_costs_are_rejected() {
        let costs = DMatrix::from_row_slice(2, 2, &[1., 0., f64::NEG_INFINITY, 1.]);
        assert_eq!(
            hungarian(&costs),
            Err(SolveError::CostOutOfRange { row: 1, col: 0, size: 2 })
        );
        let costs = DMatrix::from_row_slice(2, 2, &[f64::INFINITY, 0., 0., 1.]);
        assert!(hungarian(&costs).unwrap_err().is_malformed());
    }

    #[test]
    fn nan_is_rejected() {
        let costs = DMatrix::from_row_slice(2, 2, &[1., f64::NAN, 0., 1.]);
        assert_eq!(
            hungarian(&costs),
            Err(SolveError::IncomparableCost { row: 0, col: 1 })
        );
    }
}
