use crate::{MarketDataProvider, RangeSpec};
use core_types::{Instrument, PriceSeries};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;

/// Fetches the daily series for every instrument with bounded concurrency.
///
/// Individual failures never abort the batch: a failed fetch yields an
/// empty series for that symbol and the run continues on whatever data
/// arrived. Completion order is unspecified; the result is keyed by symbol
/// so downstream stages are order-independent.
///
/// `on_fetched` is invoked once per instrument as its fetch completes,
/// which the CLI uses to advance a progress bar.
pub async fn fetch_universe<F>(
    provider: &dyn MarketDataProvider,
    instruments: &[Instrument],
    range: &RangeSpec,
    concurrency: usize,
    mut on_fetched: F,
) -> HashMap<String, PriceSeries>
where
    F: FnMut(&Instrument),
{
    let mut fetches = stream::iter(instruments.iter().map(|instrument| async move {
        let series = match provider.fetch_daily(&instrument.symbol, range).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(
                    symbol = %instrument.symbol,
                    error = %e,
                    "fetch failed, continuing with an empty series"
                );
                PriceSeries::empty(instrument.symbol.clone())
            }
        };
        (instrument, series)
    }))
    .buffer_unordered(concurrency.max(1));

    let mut by_symbol = HashMap::with_capacity(instruments.len());
    while let Some((instrument, series)) = fetches.next().await {
        on_fetched(instrument);
        by_symbol.insert(instrument.symbol.clone(), series);
    }
    by_symbol
}
