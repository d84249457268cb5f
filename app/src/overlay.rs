// In app/src/overlay.rs

use anyhow::{Context, Result};
use core_types::{Kline, PriceSeries};
use csv::Writer;
use rust_decimal::Decimal;
use std::io::Write;
use strategies::{SmaSeries, TrendSettings, compute_sma};

/// The candle and moving-average columns a price chart draws.
pub struct Overlay<'a> {
    klines: &'a [Kline],
    short_sma: SmaSeries,
    long_sma: SmaSeries,
}

impl<'a> Overlay<'a> {
    /// Computes both averages over `klines`, which must be in time order.
    pub fn build(klines: &'a [Kline], settings: &TrendSettings) -> Result<Self> {
        let series = PriceSeries::from_klines(klines).context("Bars cannot be charted")?;
        let closes = series.closes();

        Ok(Self {
            klines,
            short_sma: compute_sma(&closes, settings.short_window),
            long_sma: compute_sma(&closes, settings.long_window),
        })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);

        wtr.write_record([
            "Date".to_string(),
            "Open".to_string(),
            "High".to_string(),
            "Low".to_string(),
            "Close".to_string(),
            format!("SMA_{}", self.short_sma.window()),
            format!("SMA_{}", self.long_sma.window()),
        ])?;

        for (i, k) in self.klines.iter().enumerate() {
            wtr.write_record([
                k.date().format("%Y-%m-%d").to_string(),
                k.open.to_string(),
                k.high.to_string(),
                k.low.to_string(),
                k.close.to_string(),
                format_value(self.short_sma.get(i)),
                format_value(self.long_sma.get(i)),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn format_value(value: Option<Decimal>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
