//! Length statistics computed once the record stream has been drained.

/// Percentile-of-cumulative-length table (N1..N99).
///
/// `Nxx::get(50)` is the classic N50: scanning lengths from longest to
/// shortest, the length at which the running sum first reaches at least 50% of
/// the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nxx {
    values: [Option<usize>; 100],
}

impl Nxx {
    /// Computes every percentile from 1 to 99 in a single scan.
    ///
    /// `lengths` is sorted in place; `total` must be the sum of `lengths` and is
    /// passed in to avoid a second pass.
    pub fn compute(lengths: &mut [usize], total: u64) -> Self {
        let mut values = [None; 100];
        if lengths.is_empty() || total == 0 {
            return Self { values };
        }

        if !lengths.is_sorted() {
            lengths.sort_unstable();
        }

        let total = u128::from(total);
        let mut cumulative: u128 = 0;
        let mut p: usize = 1;
        for &len in lengths.iter().rev() {
            cumulative += len as u128;
            while p < 100 && cumulative * 100 >= p as u128 * total {
                values[p] = Some(len);
                p += 1;
            }
            if p == 100 {
                break;
            }
        }

        Self { values }
    }

    /// Length for percentile `p` in `1..=99`, `None` outside that range or when undefined.
    pub fn get(&self, p: u8) -> Option<usize> {
        match p {
            1..=99 => self.values[p as usize],
            _ => None,
        }
    }

    pub fn n50(&self) -> Option<usize> {
        self.get(50)
    }
}

/// Median of an ascending-sorted slice.
///
/// Even-length input averages the two middle values.
pub fn median(sorted: &[usize]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2] as f64),
        _ => Some((sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0),
    }
}
