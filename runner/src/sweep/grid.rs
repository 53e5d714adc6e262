use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive integer range visited in fixed increments.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Axis {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Axis {
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        Self { min, max, step }
    }

    /// inverted bounds are not an error, the axis simply has no values
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn values(&self) -> impl Iterator<Item = i64> {
        let axis = *self;

        std::iter::successors(axis.first(), move |value| axis.after(*value))
    }

    fn first(&self) -> Option<i64> {
        (!self.is_empty()).then_some(self.min)
    }

    fn after(&self, value: i64) -> Option<i64> {
        if self.step <= 0 {
            return None;
        }

        value.checked_add(self.step).filter(|next| *next <= self.max)
    }
}

/// One assignment of all three sweep parameters.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPoint {
    pub threads: i64,
    pub rate: i64,
    pub timeout: i64,
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.threads, self.rate, self.timeout)
    }
}

/// threads (outermost) x rate x timeout (innermost)
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub threads: Axis,
    pub rate: Axis,
    pub timeout: Axis,
}

impl Grid {
    /// Fresh pass over the grid in nested-loop order.
    pub fn iter(&self) -> GridIter {
        let next = match (
            self.threads.first(),
            self.rate.first(),
            self.timeout.first(),
        ) {
            (Some(threads), Some(rate), Some(timeout)) => Some(GridPoint {
                threads,
                rate,
                timeout,
            }),
            _ => None,
        };

        GridIter {
            grid: *self,
            next,
            last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.threads.values().count() * self.rate.values().count() * self.timeout.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty() || self.rate.is_empty() || self.timeout.is_empty()
    }
}

impl IntoIterator for &Grid {
    type Item = GridPoint;
    type IntoIter = GridIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct GridIter {
    grid: Grid,
    next: Option<GridPoint>,
    last: Option<GridPoint>,
}

impl GridIter {
    /// Drop the remaining timeouts of the current (threads, rate) pair and continue with the
    /// next rate.
    pub fn skip_innermost(&mut self) {
        if let (Some(last), Some(next)) = (self.last, self.next) {
            if next.threads == last.threads && next.rate == last.rate {
                self.next = self.next_rate(last);
            }
        }
    }

    fn next_rate(&self, from: GridPoint) -> Option<GridPoint> {
        if let Some(rate) = self.grid.rate.after(from.rate) {
            Some(GridPoint {
                rate,
                timeout: self.grid.timeout.min,
                ..from
            })
        } else {
            self.grid.threads.after(from.threads).map(|threads| GridPoint {
                threads,
                rate: self.grid.rate.min,
                timeout: self.grid.timeout.min,
            })
        }
    }
}

impl Iterator for GridIter {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = match self.grid.timeout.after(current.timeout) {
            Some(timeout) => Some(GridPoint { timeout, ..current }),
            None => self.next_rate(current),
        };
        self.last = Some(current);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn grid(threads: (i64, i64), rate: (i64, i64), timeout: (i64, i64)) -> Grid {
        Grid {
            threads: Axis::new(threads.0, threads.1, 5),
            rate: Axis::new(rate.0, rate.1, 100),
            timeout: Axis::new(timeout.0, timeout.1, 10),
        }
    }

    fn triples(iter: impl Iterator<Item = GridPoint>) -> Vec<(i64, i64, i64)> {
        iter.map(|p| (p.threads, p.rate, p.timeout)).collect_vec()
    }

    #[test]
    fn axis_visits_inclusive_steps() {
        assert_eq!(Axis::new(10, 20, 5).values().collect_vec(), vec![10, 15, 20]);
        assert_eq!(Axis::new(10, 22, 5).values().collect_vec(), vec![10, 15, 20]);
        assert_eq!(Axis::new(1000, 1000, 100).values().collect_vec(), vec![1000]);
        assert!(Axis::new(20, 10, 5).values().next().is_none());
        assert_eq!(Axis::new(i64::MAX - 1, i64::MAX, 5).values().count(), 1);
    }

    #[test]
    fn nested_loop_order() {
        let points = triples(grid((10, 15), (1000, 1100), (10, 20)).iter());

        assert_eq!(
            points,
            vec![
                (10, 1000, 10),
                (10, 1000, 20),
                (10, 1100, 10),
                (10, 1100, 20),
                (15, 1000, 10),
                (15, 1000, 20),
                (15, 1100, 10),
                (15, 1100, 20),
            ]
        );
    }

    #[test]
    fn len_matches_iteration() {
        let grid = grid((10, 20), (1000, 1200), (10, 40));

        assert_eq!(grid.len(), 3 * 3 * 4);
        assert_eq!(grid.iter().count(), grid.len());
    }

    #[test]
    fn iteration_is_restartable() {
        let grid = grid((10, 20), (1000, 1000), (10, 10));

        assert_eq!(triples(grid.iter()), triples(grid.iter()));
        assert_eq!(triples((&grid).into_iter()).len(), 3);
    }

    #[test]
    fn inverted_axis_yields_nothing() {
        assert!(grid((10, 10), (1000, 900), (10, 10)).iter().next().is_none());
        assert!(grid((10, 10), (1000, 900), (10, 10)).is_empty());
        assert_eq!(grid((10, 5), (1000, 1000), (10, 10)).len(), 0);
    }

    #[test]
    fn skip_innermost_moves_to_next_rate() {
        let mut iter = grid((10, 15), (1000, 1100), (10, 40)).iter();

        assert_eq!(iter.next().map(|p| p.timeout), Some(10));
        iter.skip_innermost();
        assert_eq!(
            iter.next(),
            Some(GridPoint {
                threads: 10,
                rate: 1100,
                timeout: 10
            })
        );
        iter.skip_innermost();
        // rate axis exhausted, carries into threads
        assert_eq!(
            iter.next(),
            Some(GridPoint {
                threads: 15,
                rate: 1000,
                timeout: 10
            })
        );
    }

    #[test]
    fn skip_on_last_timeout_is_a_noop() {
        let mut iter = grid((10, 10), (1000, 1100), (10, 20)).iter();

        iter.next();
        iter.next();
        iter.skip_innermost();

        assert_eq!(triples(iter), vec![(10, 1100, 10), (10, 1100, 20)]);
    }

    #[test]
    fn skip_on_final_pair_ends_iteration() {
        let mut iter = grid((10, 10), (1000, 1000), (10, 30)).iter();

        iter.next();
        iter.skip_innermost();

        assert!(iter.next().is_none());
    }
}
