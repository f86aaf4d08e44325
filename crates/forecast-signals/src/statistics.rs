//! Flag-replay backtest statistics.

use forecast_core::error::IndicatorError;
use forecast_core::types::{Bar, PriceSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluator::SignalFlags;

/// One round trip, entered and exited at bar closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_index: usize,
    pub entry_timestamp: i64,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_timestamp: i64,
    pub exit_price: f64,
    /// Trade return percentage
    pub return_pct: f64,
    /// Still open at the end of the series, marked to the last close
    pub open: bool,
}

impl TradeRecord {
    fn new(entry: &Entry, exit_index: usize, exit: &Bar, open: bool) -> Self {
        Self {
            entry_index: entry.index,
            entry_timestamp: entry.timestamp,
            entry_price: entry.price,
            exit_index,
            exit_timestamp: exit.timestamp,
            exit_price: exit.close,
            return_pct: (exit.close / entry.price - 1.0) * 100.0,
            open,
        }
    }

    pub fn is_win(&self) -> bool {
        self.return_pct > 0.0
    }
}

/// Statistics of a long-only replay. Equity starts at 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Final equity relative to a starting equity of 1.0
    pub final_equity: f64,
    /// Total compounded return percentage
    pub total_return_pct: f64,
    /// Maximum peak-to-trough drawdown percentage
    pub max_drawdown_pct: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Win rate percentage, 0 when there are no trades
    pub win_rate_pct: f64,
    pub bars_processed: usize,
    /// Equity at the close of every bar
    pub equity_curve: Vec<(i64, f64)>,
    pub trades: Vec<TradeRecord>,
    #[serde(skip, default = "starting_equity")]
    peak_equity: f64,
}

fn starting_equity() -> f64 {
    1.0
}

impl Default for BacktestStats {
    fn default() -> Self {
        Self {
            final_equity: starting_equity(),
            total_return_pct: 0.0,
            max_drawdown_pct: 0.0,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: 0.0,
            bars_processed: 0,
            equity_curve: Vec::new(),
            trades: Vec::new(),
            peak_equity: starting_equity(),
        }
    }
}

impl BacktestStats {
    fn record_equity(&mut self, timestamp: i64, equity: f64) {
        self.equity_curve.push((timestamp, equity));

        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
        let drawdown = (self.peak_equity - equity) / self.peak_equity * 100.0;
        if drawdown > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown;
        }

        self.bars_processed += 1;
    }

    fn add_trade(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
        self.total_trades += 1;
    }

    fn finalize(&mut self, final_equity: f64) {
        self.final_equity = final_equity;
        self.total_return_pct = (final_equity - 1.0) * 100.0;

        self.winning_trades = self.trades.iter().filter(|t| t.is_win()).count();
        self.losing_trades = self.trades.iter().filter(|t| t.return_pct < 0.0).count();
        if self.total_trades > 0 {
            self.win_rate_pct = self.winning_trades as f64 * 100.0 / self.total_trades as f64;
        }
    }
}

struct Entry {
    index: usize,
    timestamp: i64,
    price: f64,
    equity: f64,
}

impl Entry {
    fn mark(&self, close: f64) -> f64 {
        self.equity * close / self.price
    }
}

/// Replay the flags as a long-only strategy.
///
/// A buy flag enters at that bar's close when flat; a sell flag exits at
/// that bar's close when long. Other flags are ignored. A position still
/// open at the end is marked to the last close and counted as a trade.
pub fn replay(series: &PriceSeries, flags: &SignalFlags) -> Result<BacktestStats, IndicatorError> {
    if flags.buy.len() != series.len() || flags.sell.len() != series.len() {
        return Err(IndicatorError::LengthMismatch {
            expected: series.len(),
            actual: flags.buy.len().max(flags.sell.len()),
        });
    }

    let mut stats = BacktestStats::default();
    let mut cash = 1.0;
    let mut position: Option<Entry> = None;

    for (index, bar) in series.iter().enumerate() {
        match position.take() {
            None if flags.buy[index] => {
                position = Some(Entry {
                    index,
                    timestamp: bar.timestamp,
                    price: bar.close,
                    equity: cash,
                });
            }
            Some(entry) if flags.sell[index] => {
                cash = entry.mark(bar.close);
                stats.add_trade(TradeRecord::new(&entry, index, bar, false));
            }
            other => position = other,
        }

        let equity = position.as_ref().map_or(cash, |entry| entry.mark(bar.close));
        stats.record_equity(bar.timestamp, equity);
    }

    if let Some(entry) = position {
        let last = series.last();
        cash = entry.mark(last.close);
        stats.add_trade(TradeRecord::new(&entry, series.len() - 1, last, true));
    }

    stats.finalize(cash);
    debug!(
        trades = stats.total_trades,
        total_return_pct = stats.total_return_pct,
        max_drawdown_pct = stats.max_drawdown_pct,
        "replayed signal flags"
    );
    Ok(stats)
}
