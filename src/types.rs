use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How many task bodies may execute at the same time.
///
/// - `Unbounded` (default): every task starts as soon as its dependencies
///   succeed, so parallelism is limited only by the width of the graph.
/// - `Bounded(n)`: at most `n` bodies execute at once. Ready tasks are still
///   marked Running immediately and wait for a free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    #[default]
    Unbounded,
    Bounded(NonZeroUsize),
}

impl Concurrency {
    /// `Bounded(n)`, or `None` if `n` is zero.
    pub fn bounded(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Concurrency::Bounded)
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            Concurrency::Unbounded => None,
            Concurrency::Bounded(n) => Some(n.get()),
        }
    }
}

impl FromStr for Concurrency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(Concurrency::Unbounded);
        }
        s.parse::<usize>()
            .ok()
            .and_then(Concurrency::bounded)
            .ok_or_else(|| {
                format!("invalid concurrency: {s} (expected \"unbounded\" or an integer >= 1)")
            })
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concurrency::Unbounded => f.write_str("unbounded"),
            Concurrency::Bounded(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyword_and_numbers() {
        assert_eq!("unbounded".parse(), Ok(Concurrency::Unbounded));
        assert_eq!(" Unbounded ".parse(), Ok(Concurrency::Unbounded));
        assert_eq!("4".parse::<Concurrency>().unwrap().limit(), Some(4));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!("0".parse::<Concurrency>().is_err());
        assert!("many".parse::<Concurrency>().is_err());
        assert_eq!(Concurrency::bounded(0), None);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Concurrency::Unbounded.to_string(), "unbounded");
        assert_eq!(Concurrency::bounded(3).unwrap().to_string(), "3");
    }
}
