//! Transaction listing: search, sort and pagination.

use crate::errors::AppError;
use crate::models::pagination::{TransactionPage, TransactionQuery};
use crate::models::transaction::Transaction;
use crate::store::{Collection, Store};

/// Fetch one page of transactions and the `total` count concurrently.
///
/// `total` counts transactions whose `name` matches the search, which is not
/// the filter used for the page itself, so it can differ from the number of
/// listed matches.
pub async fn list(store: &Store, query: &TransactionQuery) -> Result<TransactionPage, AppError> {
    let options = query.find_options()?;
    let filter = query.filter();
    let total_filter = query.total_filter();

    let (transactions, total) = tokio::try_join!(
        store.find_as::<Transaction>(Collection::Transactions, &filter, &options),
        store.count(Collection::Transactions, &total_filter),
    )?;

    tracing::debug!(
        page = query.page,
        page_size = query.page_size,
        search = query.search.as_str(),
        returned = transactions.len(),
        total,
        "Listed transactions"
    );

    Ok(TransactionPage {
        transactions,
        total,
    })
}
