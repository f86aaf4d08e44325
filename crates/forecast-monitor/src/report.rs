//! Plain-text report generation.

use chrono::DateTime;
use forecast_core::types::PriceSeries;
use forecast_gbm::{ForecastResult, HorizonEstimate};
use forecast_indicators::IndicatorSet;
use forecast_signals::{BacktestStats, SignalMarker};

const RULE: &str = "═══════════════════════════════════════════════════════════\n";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────\n";

fn header(s: &mut String, title: &str) {
    s.push_str(RULE);
    s.push_str(&format!("{:^59}\n", title));
    s.push_str(RULE);
    s.push('\n');
}

fn section(s: &mut String, title: &str) {
    s.push_str(title);
    s.push('\n');
    s.push_str(THIN_RULE);
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Last `tail` rows of every indicator line next to the close.
pub fn indicator_report(series: &PriceSeries, indicators: &IndicatorSet, tail: usize) -> String {
    let mut s = String::new();
    header(&mut s, &format!("INDICATORS  {} ({})", series.symbol, series.timeframe));

    let names: Vec<&str> = indicators.names().collect();
    s.push_str(&format!("{:<17} {:>12}", "Time", "Close"));
    for name in &names {
        s.push_str(&format!(" {:>12}", name));
    }
    s.push('\n');
    s.push_str(THIN_RULE);

    let start = series.len().saturating_sub(tail);
    for (index, bar) in series.iter().enumerate().skip(start) {
        s.push_str(&format!(
            "{:<17} {:>12.2}",
            format_timestamp(bar.timestamp),
            bar.close
        ));
        for name in &names {
            s.push_str(&format!(" {:>12}", format_value(indicators.value(name, index))));
        }
        s.push('\n');
    }
    s.push('\n');
    s.push_str(RULE);

    s
}

/// Monte-Carlo forecast summary with percentile bands per step.
pub fn forecast_report(result: &ForecastResult) -> String {
    let mut s = String::new();
    let p = &result.parameters;
    header(&mut s, "GBM FORECAST");

    section(&mut s, "PARAMETERS");
    s.push_str(&format!("  Current Price:       {:.2}\n", result.initial_price));
    s.push_str(&format!("  Drift (mu):          {:.6}\n", p.mu));
    s.push_str(&format!("  Volatility (sigma):  {:.6}\n", p.sigma));
    s.push_str(&format!("  Drift Scale:         {:.3}\n", p.drift_scale));
    s.push_str(&format!("  Rate Scale:          {:.3}\n", p.rate_scale));
    s.push_str(&format!(
        "  Horizon:             {} steps x {:.6}\n",
        p.horizon_steps, p.step_size
    ));
    s.push_str(&format!("  Simulations:         {}\n", result.runs()));
    s.push('\n');

    let summary = &result.summary;
    section(&mut s, "TERMINAL PRICE");
    s.push_str(&format!("  Expected:            {:.2}\n", summary.expected));
    s.push_str(&format!("  Median:              {:.2}\n", summary.median));
    s.push_str(&format!("  Std Dev:             {:.2}\n", summary.std_dev));
    s.push_str(&format!(
        "  {:.0}% Interval:        [{:.2}, {:.2}]\n",
        summary.interval.level * 100.0,
        summary.interval.lower,
        summary.interval.upper
    ));
    let change = (summary.expected / result.initial_price - 1.0) * 100.0;
    s.push_str(&format!("  Expected Change:     {:+.2}%\n", change));
    s.push('\n');

    if p.horizon_steps > 0 {
        section(&mut s, "PATH (p16 / mean / p84)");
        let mean = result.mean_path();
        let bands = (result.quantile_path(0.16), result.quantile_path(0.84));
        if let (Ok(low), Ok(high)) = bands {
            for k in 0..p.horizon_steps {
                s.push_str(&format!(
                    "  {:>4}  {:>12.2} {:>12.2} {:>12.2}\n",
                    k + 1,
                    low[k],
                    mean[k],
                    high[k]
                ));
            }
        }
        s.push('\n');
    }

    s.push_str(RULE);
    s
}

/// Closed-form estimate at one horizon.
pub fn horizon_report(current_price: f64, estimate: &HorizonEstimate) -> String {
    let mut s = String::new();
    header(&mut s, "GBM HORIZON ESTIMATE");

    s.push_str(&format!("  Current Price:       {:.2}\n", current_price));
    s.push_str(&format!("  Horizon:             {:.4}\n", estimate.horizon));
    s.push_str(&format!("  Draw (z):            {:.4}\n", estimate.z));
    s.push_str(&format!("  Forecast:            {:.2}\n", estimate.forecast));
    s.push_str(&format!("  Std Dev:             {:.2}\n", estimate.std_dev));
    s.push_str(&format!(
        "  68% Band:            [{:.2}, {:.2}]\n",
        estimate.lower, estimate.upper
    ));
    s.push('\n');
    s.push_str(RULE);

    s
}

/// Signal markers and the replay statistics.
pub fn signal_report(symbol: &str, markers: &[SignalMarker], stats: &BacktestStats) -> String {
    let mut s = String::new();
    header(&mut s, &format!("SIGNAL BACKTEST  {}", symbol));

    section(&mut s, "SIGNALS");
    if markers.is_empty() {
        s.push_str("  No signals\n");
    }
    for marker in markers {
        s.push_str(&format!(
            "  {:<17} {:<5} {:>12.2}\n",
            format_timestamp(marker.timestamp),
            marker.side,
            marker.price
        ));
    }
    s.push('\n');

    section(&mut s, "PERFORMANCE");
    s.push_str(&format!("  Total Return:        {:.2}%\n", stats.total_return_pct));
    s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
    s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
    s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
    s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
    s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
    s.push_str(&format!("  Bars Processed:      {}\n", stats.bars_processed));
    s.push('\n');

    if !stats.trades.is_empty() {
        section(&mut s, "TRADES");
        for trade in &stats.trades {
            s.push_str(&format!(
                "  {} @ {:.2} -> {} @ {:.2}  {:+.2}%{}\n",
                format_timestamp(trade.entry_timestamp),
                trade.entry_price,
                format_timestamp(trade.exit_timestamp),
                trade.exit_price,
                trade.return_pct,
                if trade.open { " (open)" } else { "" }
            ));
        }
        s.push('\n');
    }

    s.push_str(RULE);
    s
}
