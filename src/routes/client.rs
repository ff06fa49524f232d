//! Client routes: products, customers, transactions and geography for the dashboard.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::models::geography::LocationCount;
use crate::models::pagination::{TransactionPage, TransactionParams, TransactionQuery};
use crate::models::product::ProductWithStats;
use crate::models::user::UserResponse;
use crate::services::{
    customers as customer_service, geography as geography_service, products as product_service,
    transactions as transaction_service,
};
use crate::AppState;

/// GET /client/products: every product with its yearly stats under `stat`.
pub async fn products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductWithStats>>, AppError> {
    let result = product_service::list_with_stats(&state.store).await?;
    Ok(Json(result))
}

/// GET /client/customers: users with the `user` role, without passwords.
pub async fn customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let result = customer_service::list(&state.store).await?;
    Ok(Json(result))
}

/// GET /client/transactions: search, sort and paginate transactions.
///
/// Query parameters: `page` (default 1), `pageSize` (default 20),
/// `sort` (JSON `{"field": ..., "sort": "asc"|"desc"}`) and `search`.
pub async fn transactions(
    State(state): State<AppState>,
    params: Result<Query<TransactionParams>, QueryRejection>,
) -> Result<Json<TransactionPage>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidQuery(e.body_text()))?;
    let query = TransactionQuery::from_params(&params)?;
    let page = transaction_service::list(&state.store, &query).await?;
    Ok(Json(page))
}

/// GET /client/geography: user counts per ISO3 country code.
pub async fn geography(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationCount>>, AppError> {
    let result = geography_service::user_locations(&state.store).await?;
    Ok(Json(result))
}
