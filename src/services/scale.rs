//! Percentile colour scale for count-based values

use crate::types::DayValue;

/// Class for cells without a value
pub const EMPTY_CLASS: &str = "color-empty";

/// Scale level derived from percentiles of the non-zero counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleLevel {
    /// No value on this day
    Empty,
    /// A value with a zero count
    Zero,
    /// 1-25th percentile
    Low,
    /// 25-50th percentile
    Medium,
    /// 50-75th percentile
    High,
    /// 75-100th percentile
    Max,
}

impl ScaleLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Empty => EMPTY_CLASS,
            Self::Zero => "color-scale-0",
            Self::Low => "color-scale-1",
            Self::Medium => "color-scale-2",
            Self::High => "color-scale-3",
            Self::Max => "color-scale-4",
        }
    }

    /// Inverse of [`ScaleLevel::class_name`]; caller-defined classes map to `None`
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        match class_name {
            EMPTY_CLASS => Some(Self::Empty),
            "color-scale-0" => Some(Self::Zero),
            "color-scale-1" => Some(Self::Low),
            "color-scale-2" => Some(Self::Medium),
            "color-scale-3" => Some(Self::High),
            "color-scale-4" => Some(Self::Max),
            _ => None,
        }
    }
}

/// Percentile thresholds for level mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentiles {
    pub p25: u64,
    pub p50: u64,
    pub p75: u64,
}

impl Percentiles {
    pub fn level(self, count: u64) -> ScaleLevel {
        if count == 0 {
            ScaleLevel::Zero
        } else if count <= self.p25 {
            ScaleLevel::Low
        } else if count <= self.p50 {
            ScaleLevel::Medium
        } else if count <= self.p75 {
            ScaleLevel::High
        } else {
            ScaleLevel::Max
        }
    }
}

/// Calculate percentiles from a list of counts (excluding zeros)
pub fn calculate_percentiles(values: &[u64]) -> Option<Percentiles> {
    let mut non_zero: Vec<u64> = values.iter().copied().filter(|&v| v > 0).collect();
    if non_zero.is_empty() {
        return None;
    }

    non_zero.sort_unstable();
    let len = non_zero.len();

    let p25_idx = (len as f64 * 0.25).ceil() as usize - 1;
    let p50_idx = (len as f64 * 0.50).ceil() as usize - 1;
    let p75_idx = (len as f64 * 0.75).ceil() as usize - 1;

    Some(Percentiles {
        p25: non_zero[p25_idx.min(len - 1)],
        p50: non_zero[p50_idx.min(len - 1)],
        p75: non_zero[p75_idx.min(len - 1)],
    })
}

/// Colour scale fitted to one set of values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    percentiles: Option<Percentiles>,
}

impl ColorScale {
    pub fn from_values(values: &[DayValue]) -> Self {
        let counts: Vec<u64> = values.iter().map(DayValue::count_or_zero).collect();
        Self {
            percentiles: calculate_percentiles(&counts),
        }
    }

    pub fn level(self, value: Option<&DayValue>) -> ScaleLevel {
        match (value, self.percentiles) {
            (None, _) => ScaleLevel::Empty,
            (Some(v), Some(p)) => p.level(v.count_or_zero()),
            (Some(_), None) => ScaleLevel::Zero,
        }
    }

    pub fn class_for(self, value: Option<&DayValue>) -> String {
        self.level(value).class_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== calculate_percentiles tests ==========

    #[test]
    fn test_calculate_percentiles_empty() {
        assert!(calculate_percentiles(&[]).is_none());
    }

    #[test]
    fn test_calculate_percentiles_all_zeros() {
        assert!(calculate_percentiles(&[0, 0, 0]).is_none());
    }

    #[test]
    fn test_calculate_percentiles_single_value() {
        let p = calculate_percentiles(&[100]).unwrap();
        assert_eq!((p.p25, p.p50, p.p75), (100, 100, 100));
    }

    #[test]
    fn test_calculate_percentiles_four_values() {
        let p = calculate_percentiles(&[40, 10, 30, 20]).unwrap();
        assert_eq!(p.p25, 10); // 25% of 4 = 1 -> index 0
        assert_eq!(p.p50, 20);
        assert_eq!(p.p75, 30);
    }

    #[test]
    fn test_calculate_percentiles_ignores_zeros() {
        let p = calculate_percentiles(&[0, 100, 0, 200, 0, 300, 0, 400]).unwrap();
        assert_eq!((p.p25, p.p50, p.p75), (100, 200, 300));
    }

    // ========== level mapping tests ==========

    #[test]
    fn test_level_mapping() {
        let p = Percentiles {
            p25: 100,
            p50: 200,
            p75: 300,
        };

        assert_eq!(p.level(0), ScaleLevel::Zero);
        assert_eq!(p.level(50), ScaleLevel::Low);
        assert_eq!(p.level(100), ScaleLevel::Low);
        assert_eq!(p.level(150), ScaleLevel::Medium);
        assert_eq!(p.level(250), ScaleLevel::High);
        assert_eq!(p.level(400), ScaleLevel::Max);
    }

    #[test]
    fn test_class_name_round_trip() {
        for level in [
            ScaleLevel::Empty,
            ScaleLevel::Zero,
            ScaleLevel::Low,
            ScaleLevel::Medium,
            ScaleLevel::High,
            ScaleLevel::Max,
        ] {
            assert_eq!(ScaleLevel::from_class_name(level.class_name()), Some(level));
        }
        assert_eq!(ScaleLevel::from_class_name("color-github-2"), None);
    }

    // ========== ColorScale tests ==========

    #[test]
    fn test_scale_separates_empty_from_zero() {
        let values = vec![
            DayValue::new("2024-01-01", 0),
            DayValue::new("2024-01-02", 10),
            DayValue::new("2024-01-03", 40),
        ];
        let scale = ColorScale::from_values(&values);
        assert_eq!(scale.class_for(None), "color-empty");
        assert_eq!(scale.class_for(Some(&values[0])), "color-scale-0");
        assert_eq!(scale.class_for(Some(&values[1])), "color-scale-1");
        // p75 of [10, 40] is 40 itself
        assert_eq!(scale.class_for(Some(&values[2])), "color-scale-3");
    }

    #[test]
    fn test_scale_without_counts() {
        let mut value = DayValue::new("2024-01-01", 0);
        value.count = None;
        let scale = ColorScale::from_values(std::slice::from_ref(&value));
        assert_eq!(scale.level(Some(&value)), ScaleLevel::Zero);
        assert_eq!(scale.level(None), ScaleLevel::Empty);
    }
}
