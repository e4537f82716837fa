/// Points for clearing 0, 1, 2, 3 and 4 rows with a single lock.
pub const CLASSIC_POINTS: [u64; 5] = [0, 100, 300, 500, 800];

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ScoreTableError {
    #[error("a score table needs an entry for at least one line")]
    TooShort,
    #[error("clearing no lines must score nothing, not {0}")]
    NonZeroBase(u64),
    #[error("clearing {lines} lines scores {points}, which is not more than clearing one fewer")]
    NotIncreasing { lines: usize, points: u64 },
}

/// Points per number of rows cleared by one lock.
///
/// Strictly increasing in the number of rows. Counts past the end of the
/// table keep climbing by the table's last step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    points: Vec<u64>,
}

impl ScoreTable {
    /// `points[n]` is the award for clearing `n` rows at once.
    pub fn new(points: Vec<u64>) -> Result<Self, ScoreTableError> {
        match points.as_slice() {
            [] | [_] => return Err(ScoreTableError::TooShort),
            [base, ..] if *base != 0 => return Err(ScoreTableError::NonZeroBase(*base)),
            _ => {}
        }
        if let Some(lines) = (1..points.len()).find(|&lines| points[lines] <= points[lines - 1]) {
            return Err(ScoreTableError::NotIncreasing {
                lines,
                points: points[lines],
            });
        }
        Ok(Self { points })
    }

    pub fn classic() -> Self {
        Self {
            points: CLASSIC_POINTS.to_vec(),
        }
    }

    pub fn points(&self, lines_cleared: usize) -> u64 {
        if let Some(points) = self.points.get(lines_cleared) {
            return *points;
        }
        let last = self.points.len() - 1;
        let step = self.points[last] - self.points[last - 1];
        let extra = (lines_cleared - last) as u64;
        self.points[last].saturating_add(step.saturating_mul(extra))
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_table() {
        let table = ScoreTable::classic();
        assert_eq!(table.points(0), 0);
        assert_eq!(table.points(1), 100);
        assert_eq!(table.points(2), 300);
        assert_eq!(table.points(3), 500);
        assert_eq!(table.points(4), 800);
    }

    #[test]
    fn extends_past_the_table() {
        let table = ScoreTable::classic();
        assert_eq!(table.points(5), 1100);
        assert_eq!(table.points(6), 1400);
    }

    #[test]
    fn always_increasing() {
        let table = ScoreTable::classic();
        for lines in 1..20 {
            assert!(table.points(lines) > table.points(lines - 1));
        }
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(ScoreTable::new(vec![]), Err(ScoreTableError::TooShort));
        assert_eq!(ScoreTable::new(vec![0]), Err(ScoreTableError::TooShort));
        assert_eq!(
            ScoreTable::new(vec![10, 20]),
            Err(ScoreTableError::NonZeroBase(10))
        );
        assert_eq!(
            ScoreTable::new(vec![0, 100, 100]),
            Err(ScoreTableError::NotIncreasing {
                lines: 2,
                points: 100
            })
        );
    }

    #[test]
    fn custom_table() -> anyhow::Result<()> {
        let table = ScoreTable::new(vec![0, 40, 100, 300, 1200])?;
        assert_eq!(table.points(4), 1200);
        assert_eq!(table.points(5), 2100);
        Ok(())
    }
}
