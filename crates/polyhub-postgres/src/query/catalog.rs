//! Catalog products and taxonomy terms.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use super::{contains_pattern, touched};
use crate::model::{NewProduct, NewTaxonomyTerm, Product, ProductTerm, TaxonomyTerm, UpdateProduct};
use crate::types::{OffsetPage, OffsetPagination, TaxonomyKind};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Product listing filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub owner_id: Option<Uuid>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
}

/// A product id resolved to its name and owning account.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct ProductOwnerRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub owner_id: Uuid,
}

pub trait ProductRepository {
    /// Inserts the product and links its multi-valued taxonomy terms.
    fn create_product(
        &mut self,
        new_product: NewProduct,
        term_ids: Vec<Uuid>,
    ) -> impl Future<Output = PgResult<Product>> + Send;

    fn find_product_by_id(
        &mut self,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Product>>> + Send;

    /// Multi-valued taxonomy terms linked to a product.
    fn find_product_terms(
        &mut self,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<TaxonomyTerm>>> + Send;

    fn find_product_owner(
        &mut self,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ProductOwnerRow>>> + Send;

    /// Applies `updates`. When `term_ids` is set, the linked terms are
    /// replaced in the same transaction.
    fn update_product(
        &mut self,
        product_id: Uuid,
        updates: UpdateProduct,
        term_ids: Option<Vec<Uuid>>,
    ) -> impl Future<Output = PgResult<Product>> + Send;

    /// Returns `false` if the product did not exist.
    fn delete_product(&mut self, product_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    /// Newest first.
    fn list_products(
        &mut self,
        filter: &ProductFilter,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<Product>>> + Send;
}

pub trait TaxonomyRepository {
    fn create_taxonomy_term(
        &mut self,
        new_term: NewTaxonomyTerm,
    ) -> impl Future<Output = PgResult<TaxonomyTerm>> + Send;

    /// Alphabetical, optionally restricted to one kind.
    fn list_taxonomy_terms(
        &mut self,
        kind: Option<TaxonomyKind>,
    ) -> impl Future<Output = PgResult<Vec<TaxonomyTerm>>> + Send;

    fn find_taxonomy_terms(
        &mut self,
        term_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<TaxonomyTerm>>> + Send;
}

fn filtered_products(filter: &ProductFilter) -> schema::products::BoxedQuery<'static, Pg> {
    use schema::products::{self, dsl};

    let mut query = products::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(dsl::created_by.eq(owner_id));
    }
    if let Some(family_id) = filter.chemical_family_id {
        query = query.filter(dsl::chemical_family_id.eq(family_id));
    }
    if let Some(polymer_type_id) = filter.polymer_type_id {
        query = query.filter(dsl::polymer_type_id.eq(polymer_type_id));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(dsl::name.ilike(contains_pattern(search)));
    }

    query
}

impl ProductRepository for PgConnection {
    async fn create_product(
        &mut self,
        new_product: NewProduct,
        term_ids: Vec<Uuid>,
    ) -> PgResult<Product> {
        use schema::{product_terms, products};

        let product = self
            .transaction(|conn| {
                Box::pin(async move {
                    let product: Product = diesel::insert_into(products::table)
                        .values(&new_product)
                        .returning(Product::as_returning())
                        .get_result(conn)
                        .await?;

                    let links: Vec<_> = term_ids
                        .into_iter()
                        .map(|term_id| ProductTerm {
                            product_id: product.id,
                            term_id,
                        })
                        .collect();
                    if !links.is_empty() {
                        diesel::insert_into(product_terms::table)
                            .values(&links)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }

                    Ok::<_, PgError>(product)
                })
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            product_id = %product.id,
            owner_id = %product.created_by,
            "product created"
        );

        Ok(product)
    }

    async fn find_product_by_id(&mut self, product_id: Uuid) -> PgResult<Option<Product>> {
        use schema::products::{self, dsl};

        products::table
            .filter(dsl::id.eq(product_id))
            .select(Product::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_product_terms(&mut self, product_id: Uuid) -> PgResult<Vec<TaxonomyTerm>> {
        use schema::{product_terms, taxonomy_terms};

        product_terms::table
            .inner_join(taxonomy_terms::table)
            .filter(product_terms::product_id.eq(product_id))
            .order((taxonomy_terms::kind.asc(), taxonomy_terms::name.asc()))
            .select(TaxonomyTerm::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_product_owner(&mut self, product_id: Uuid) -> PgResult<Option<ProductOwnerRow>> {
        use schema::products::{self, dsl};

        products::table
            .filter(dsl::id.eq(product_id))
            .select((dsl::id, dsl::name, dsl::created_by))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_product(
        &mut self,
        product_id: Uuid,
        mut updates: UpdateProduct,
        term_ids: Option<Vec<Uuid>>,
    ) -> PgResult<Product> {
        use schema::{product_terms, products};

        self.transaction(|conn| {
            Box::pin(async move {
                let product: Product =
                    diesel::update(products::table.filter(products::id.eq(product_id)))
                        .set((&updates, touched(products::updated_at)))
                        .returning(Product::as_returning())
                        .get_result(conn)
                        .await?;

                if let Some(term_ids) = term_ids {
                    diesel::delete(
                        product_terms::table.filter(product_terms::product_id.eq(product_id)),
                    )
                    .execute(conn)
                    .await?;

                    let links: Vec<_> = term_ids
                        .into_iter()
                        .map(|term_id| ProductTerm {
                            product_id,
                            term_id,
                        })
                        .collect();
                    if !links.is_empty() {
                        diesel::insert_into(product_terms::table)
                            .values(&links)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }
                }

                Ok::<_, PgError>(product)
            })
        })
        .await
    }

    async fn delete_product(&mut self, product_id: Uuid) -> PgResult<bool> {
        use schema::products::{self, dsl};

        let deleted = diesel::delete(products::table.filter(dsl::id.eq(product_id)))
            .execute(self)
            .await?;

        Ok(deleted > 0)
    }

    async fn list_products(
        &mut self,
        filter: &ProductFilter,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<Product>> {
        use schema::products::dsl;

        let total: i64 = filtered_products(filter).count().get_result(self).await?;
        let items = filtered_products(filter)
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Product::as_select())
            .load(self)
            .await?;

        Ok(OffsetPage::new(items, total))
    }
}

impl TaxonomyRepository for PgConnection {
    async fn create_taxonomy_term(&mut self, mut new_term: NewTaxonomyTerm) -> PgResult<TaxonomyTerm> {
        use schema::taxonomy_terms;

        new_term.name = new_term.name.trim().to_owned();

        diesel::insert_into(taxonomy_terms::table)
            .values(&new_term)
            .returning(TaxonomyTerm::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_taxonomy_terms(&mut self, kind: Option<TaxonomyKind>) -> PgResult<Vec<TaxonomyTerm>> {
        use schema::taxonomy_terms::{self, dsl};

        let mut query = taxonomy_terms::table
            .order((dsl::kind.asc(), dsl::name.asc()))
            .select(TaxonomyTerm::as_select())
            .into_boxed();

        if let Some(kind) = kind {
            query = query.filter(dsl::kind.eq(kind));
        }

        query.load(self).await.map_err(PgError::from)
    }

    async fn find_taxonomy_terms(&mut self, term_ids: &[Uuid]) -> PgResult<Vec<TaxonomyTerm>> {
        use schema::taxonomy_terms::{self, dsl};

        if term_ids.is_empty() {
            return Ok(Vec::new());
        }

        taxonomy_terms::table
            .filter(dsl::id.eq_any(term_ids.to_vec()))
            .select(TaxonomyTerm::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
