//! Offset pagination over indexer queries.

use crate::SourceError;
use cashscope_types::{Outpoint, UnspentOutput};
use std::collections::HashSet;
use std::future::Future;

/// Maximum rows the indexer returns per query.
pub const PAGE_SIZE: usize = 5000;

/// All rows of a paginated query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paginated {
    pub rows: Vec<UnspentOutput>,
    /// Number of queries issued, including the first.
    pub pages: usize,
}

/// Read pages at offsets `0, PAGE_SIZE, 2 * PAGE_SIZE, ...` until one comes
/// back short, then return the concatenation.
///
/// Pages are fetched one after another. A failing page fails the whole
/// collection; nothing is aggregated from a partial set. Rows whose outpoint
/// was already seen on an earlier page are dropped, so a UTXO set shifting
/// between requests cannot be double counted.
pub async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Paginated, SourceError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<UnspentOutput>, SourceError>>,
{
    let mut seen: HashSet<Outpoint> = HashSet::new();
    let mut result = Paginated::default();
    let mut offset = 0;

    loop {
        let page = fetch_page(offset).await.map_err(|e| {
            if offset == 0 {
                e
            } else {
                SourceError::Page {
                    offset,
                    source: Box::new(e),
                }
            }
        })?;
        result.pages += 1;
        let returned = page.len();

        for row in page {
            match row.outpoint {
                Some(outpoint) if !seen.insert(outpoint) => {
                    tracing::debug!(%outpoint.tx_hash, index = outpoint.index, "duplicate row across pages");
                }
                _ => result.rows.push(row),
            }
        }

        if returned < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
        tracing::debug!(offset, "page full, requesting next page");
    }

    Ok(result)
}
