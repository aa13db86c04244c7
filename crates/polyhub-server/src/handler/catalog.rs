//! Catalog product and taxonomy handlers.
//!
//! Browsing lives under `/catalog` and needs no token. Writes require a
//! seller or an administrator, and only the owning account or an
//! administrator may change an existing product.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_postgres::PgClient;
use polyhub_postgres::model;
use polyhub_postgres::query::{ProductFilter, ProductRepository, TaxonomyRepository};
use polyhub_postgres::types::OffsetPagination;
use uuid::Uuid;
use validator::Validate;

use super::request::{
    CreateProduct, CreateTaxonomyTerm, Pagination, ProductPathParams, ProductQuery,
    TaxonomyQuery, UpdateProduct,
};
use super::response::{ErrorResponse, Page, Product, TaxonomyTerm, TaxonomyTerms};
use crate::extract::{AuthState, Json, Path, Query, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for catalog operations.
const TRACING_TARGET: &str = "polyhub_server::handler::catalog";

fn product_not_found(product_id: Uuid) -> Error<'static> {
    ErrorKind::NotFound
        .with_resource("product")
        .with_message("Product not found")
        .with_context(format!("Product ID: {product_id}"))
}

/// Rejects callers that neither own the product nor administer the platform.
fn authorize_owner(auth_state: &AuthState, product: &model::Product) -> Result<()> {
    if auth_state.actor().is_admin() || product.created_by == auth_state.account_id {
        return Ok(());
    }

    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %auth_state.account_id,
        product_id = %product.id,
        "product owner check failed",
    );
    Err(ErrorKind::Forbidden
        .with_resource("product")
        .with_message("Only the owner of this product can change it"))
}

/// Creates a product owned by the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_product(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    auth_state.authorize_seller()?;

    let (new_product, term_ids) = request.into_model(auth_state.account_id);
    let mut conn = pg_client.get_connection().await?;
    let product = conn.create_product(new_product, term_ids).await?;
    let terms = conn.find_product_terms(product.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        product_id = %product.id,
        "product created",
    );

    Ok((StatusCode::CREATED, Json(Product::with_terms(product, terms))))
}

fn create_product_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create product")
        .description("Adds a product to the catalog. Requires a seller or an administrator.")
        .response::<201, Json<Product>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Retrieves a product with its linked taxonomy terms.
#[tracing::instrument(skip_all, fields(product_id = %path_params.product_id))]
async fn get_product(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<ProductPathParams>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some(product) = conn.find_product_by_id(path_params.product_id).await? else {
        return Err(product_not_found(path_params.product_id));
    };

    let terms = conn.find_product_terms(product.id).await?;
    Ok((StatusCode::OK, Json(Product::with_terms(product, terms))))
}

fn get_product_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get product")
        .response::<200, Json<Product>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists catalog products, newest first.
#[tracing::instrument(skip_all)]
async fn list_products(
    State(pg_client): State<PgClient>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ProductQuery>,
) -> Result<(StatusCode, Json<Page<Product>>)> {
    pagination.validate()?;
    query.validate()?;

    let offset = OffsetPagination::from(pagination);
    let filter = ProductFilter::from(query);
    let mut conn = pg_client.get_connection().await?;
    let page = conn.list_products(&filter, offset).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        total = page.total,
        returned = page.items.len(),
        "products listed",
    );

    Ok((
        StatusCode::OK,
        Json(Page::from_offset_page(page, offset, Product::from)),
    ))
}

fn list_products_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List products")
        .description(
            "Filters by owner, chemical family, polymer type and a case-insensitive \
             name search.",
        )
        .response::<200, Json<Page<Product>>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Applies a partial update to a product.
#[tracing::instrument(skip_all, fields(product_id = %path_params.product_id))]
async fn update_product(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ProductPathParams>,
    ValidateJson(request): ValidateJson<UpdateProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some(product) = conn.find_product_by_id(path_params.product_id).await? else {
        return Err(product_not_found(path_params.product_id));
    };

    authorize_owner(&auth_state, &product)?;

    let (changes, term_ids) = request.into_model();
    let product = conn.update_product(product.id, changes, term_ids).await?;
    let terms = conn.find_product_terms(product.id).await?;

    tracing::info!(target: TRACING_TARGET, "product updated");
    Ok((StatusCode::OK, Json(Product::with_terms(product, terms))))
}

fn update_product_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update product")
        .description("Absent fields are kept. Only the owner or an administrator may update.")
        .response::<200, Json<Product>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a product.
#[tracing::instrument(skip_all, fields(product_id = %path_params.product_id))]
async fn delete_product(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ProductPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let Some(product) = conn.find_product_by_id(path_params.product_id).await? else {
        return Err(product_not_found(path_params.product_id));
    };

    authorize_owner(&auth_state, &product)?;

    if !conn.delete_product(product.id).await? {
        return Err(product_not_found(product.id));
    }

    tracing::info!(target: TRACING_TARGET, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_product_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete product")
        .description("Only the owner or an administrator may delete.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists taxonomy terms, optionally of a single kind.
#[tracing::instrument(skip_all)]
async fn list_taxonomy_terms(
    State(pg_client): State<PgClient>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<(StatusCode, Json<TaxonomyTerms>)> {
    let mut conn = pg_client.get_connection().await?;
    let terms = conn.list_taxonomy_terms(query.kind).await?;

    let terms = terms.into_iter().map(TaxonomyTerm::from).collect();
    Ok((StatusCode::OK, Json(terms)))
}

fn list_taxonomy_terms_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List taxonomy terms")
        .description("Ordered by kind, then name.")
        .response::<200, Json<TaxonomyTerms>>()
}

/// Creates a taxonomy term. Admin only.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_taxonomy_term(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateTaxonomyTerm>,
) -> Result<(StatusCode, Json<TaxonomyTerm>)> {
    auth_state.authorize_admin()?;

    let mut conn = pg_client.get_connection().await?;
    let term = conn.create_taxonomy_term(request.into_model()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        term_id = %term.id,
        kind = %term.kind,
        "taxonomy term created",
    );

    Ok((StatusCode::CREATED, Json(term.into())))
}

fn create_taxonomy_term_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create taxonomy term")
        .description("Names are unique per kind. Requires an administrator.")
        .response::<201, Json<TaxonomyTerm>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns catalog routes that require authentication.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/products", post_with(create_product, create_product_docs))
        .api_route(
            "/products/{productId}",
            patch_with(update_product, update_product_docs)
                .delete_with(delete_product, delete_product_docs),
        )
        .api_route(
            "/taxonomy",
            post_with(create_taxonomy_term, create_taxonomy_term_docs),
        )
        .with_path_items(|item| item.tag("Catalog"))
}

/// Returns catalog routes open to anonymous callers.
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/catalog/products",
            get_with(list_products, list_products_docs),
        )
        .api_route(
            "/catalog/products/{productId}",
            get_with(get_product, get_product_docs),
        )
        .api_route(
            "/catalog/taxonomy",
            get_with(list_taxonomy_terms, list_taxonomy_terms_docs),
        )
        .with_path_items(|item| item.tag("Catalog"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handler::test::{TestMarket, bearer};

    #[tokio::test]
    async fn only_sellers_and_admins_add_products() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        for role in [AccountRole::Buyer, AccountRole::Expert] {
            let token = bearer(&market, Uuid::now_v7(), role)?;
            market
                .server
                .post("/products")
                .authorization_bearer(&token)
                .json(&json!({ "name": "PP Raffia" }))
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }

        market
            .server
            .post("/products")
            .json(&json!({ "name": "PP Raffia" }))
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn product_payloads_are_validated() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Seller)?;

        let response = market
            .server
            .post("/products")
            .authorization_bearer(&token)
            .json(&json!({ "name": "HDPE 5502", "price": "-1", "leadTime": "x".repeat(101) }))
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        let fields: Vec<_> = body["validation"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|detail| detail["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["leadTime", "price"]);

        market
            .server
            .patch(&format!("/products/{}", Uuid::now_v7()))
            .authorization_bearer(&token)
            .json(&json!({ "stock": "-5" }))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn taxonomy_terms_are_admin_only() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Seller)?;

        market
            .server
            .post("/taxonomy")
            .authorization_bearer(&token)
            .json(&json!({ "kind": "grade", "name": "Film" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn catalog_listing_checks_paging_without_a_token() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        let response = market
            .server
            .get("/catalog/products")
            .add_query_param("limit", 500)
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["validation"][0]["field"], json!("limit"));
        Ok(())
    }
}
