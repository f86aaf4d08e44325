//! Trend indicators built from high/low ranges.

use serde::{Deserialize, Serialize};

/// Ichimoku lines aligned to the input bars.
///
/// Leading spans are reported at the bar they are computed from. Shifting
/// them forward for display is left to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IchimokuLines {
    /// Conversion line (Tenkan-sen)
    pub tenkan: Vec<Option<f64>>,
    /// Base line (Kijun-sen)
    pub kijun: Vec<Option<f64>>,
    /// Leading span A: midpoint of conversion and base lines
    pub senkou_a: Vec<Option<f64>>,
    /// Leading span B: midpoint of the long high/low range
    pub senkou_b: Vec<Option<f64>>,
}

/// Ichimoku Kinko Hyo.
#[derive(Debug, Clone)]
pub struct Ichimoku {
    conversion: usize,
    base: usize,
    span_b: usize,
}

impl Ichimoku {
    /// Create Ichimoku with the classic periods (9, 26, 52).
    pub fn new() -> Self {
        Self::with_periods(9, 26, 52)
    }

    /// Create Ichimoku with custom periods.
    pub fn with_periods(conversion: usize, base: usize, span_b: usize) -> Self {
        assert!(conversion > 0 && base > 0 && span_b > 0);
        Self {
            conversion,
            base,
            span_b,
        }
    }

    /// Midpoint of the highest high and lowest low over a trailing window.
    fn midpoint_channel(high: &[f64], low: &[f64], period: usize) -> Vec<Option<f64>> {
        let len = high.len().min(low.len());

        (0..len)
            .map(|i| {
                if i + 1 < period {
                    return None;
                }
                let start = i + 1 - period;
                let highest = high[start..=i]
                    .iter()
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max);
                let lowest = low[start..=i].iter().cloned().fold(f64::INFINITY, f64::min);
                Some((highest + lowest) / 2.0)
            })
            .collect()
    }

    /// Calculate all lines from high and low prices.
    pub fn calculate_hl(&self, high: &[f64], low: &[f64]) -> IchimokuLines {
        let tenkan = Self::midpoint_channel(high, low, self.conversion);
        let kijun = Self::midpoint_channel(high, low, self.base);
        let senkou_b = Self::midpoint_channel(high, low, self.span_b);

        let senkou_a = tenkan
            .iter()
            .zip(kijun.iter())
            .map(|(t, k)| match (t, k) {
                (Some(t), Some(k)) => Some((t + k) / 2.0),
                _ => None,
            })
            .collect();

        IchimokuLines {
            tenkan,
            kijun,
            senkou_a,
            senkou_b,
        }
    }
}

impl Default for Ichimoku {
    fn default() -> Self {
        Self::new()
    }
}
