//! In-memory implementations of every store, sink and cache contract.
//!
//! Used by unit tests here and by the HTTP tests of the server crate.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dashboard::DashboardCache;
use crate::deal::{BestDeal, DealChanges, DealFacet, DealFilter, DealStatus, NewDealRecord};
use crate::notify::{NewNotification, NotificationSink};
use crate::quote::{
    NewQuoteRecord, QuoteFacet, QuoteFilter, QuoteRequest, QuoteWithSeller, SellerResponse,
    StatusEntry, StatusHistory,
};
use crate::store::{CatalogStore, DealStore, ProductOwner, QuoteStore};
use crate::types::{AccountRole, AccountSummary, PageRequest};
use crate::{Error, MarketContext, Result};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Uuid, AccountSummary>,
    products: HashMap<Uuid, ProductOwner>,
    quotes: HashMap<Uuid, QuoteRequest>,
    deals: HashMap<Uuid, BestDeal>,
    notifications: Vec<NewNotification>,
    cache: HashMap<String, (String, Instant)>,
}

/// Shared in-memory backend. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    fail_notifications: Arc<AtomicBool>,
    fail_cache: Arc<AtomicBool>,
    deal_writes: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context whose every dependency is this store.
    pub fn context(&self) -> MarketContext {
        let shared = Arc::new(self.clone());
        MarketContext::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared,
        )
    }

    /// Registers an account and returns its id.
    pub async fn add_account(&self, role: AccountRole, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        let slug = name.to_lowercase().replace(' ', ".");
        let account = AccountSummary {
            id,
            display_name: name.to_owned(),
            company_name: Some(name.to_owned()),
            email_address: format!("{slug}.{}@example.com", id.simple()),
            role,
        };
        self.state.write().await.accounts.insert(id, account);
        id
    }

    /// Registers a product owned by `owner_id` and returns its id.
    pub async fn add_product(&self, owner_id: Uuid, name: &str) -> Uuid {
        let product_id = Uuid::now_v7();
        let product = ProductOwner {
            product_id,
            product_name: name.to_owned(),
            owner_id,
        };
        self.state.write().await.products.insert(product_id, product);
        product_id
    }

    /// Every notification emitted so far, oldest first.
    pub async fn notifications(&self) -> Vec<NewNotification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn quote_count(&self) -> usize {
        self.state.read().await.quotes.len()
    }

    /// Number of deal inserts and updates performed.
    pub async fn deal_writes(&self) -> u64 {
        self.deal_writes.load(Ordering::SeqCst)
    }

    pub async fn clear_cache(&self) {
        self.state.write().await.cache.clear();
    }

    /// Makes every subsequent notification emit fail.
    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent cache read and write fail.
    pub fn fail_cache(&self, fail: bool) {
        self.fail_cache.store(fail, Ordering::SeqCst);
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items = items
        .drain(..)
        .skip(offset)
        .take(page.limit() as usize)
        .collect();
    (items, total)
}

#[async_trait::async_trait]
impl QuoteStore for MemoryStore {
    async fn insert_quote(&self, record: NewQuoteRecord) -> Result<QuoteRequest> {
        let now = Timestamp::now();
        let quote = QuoteRequest {
            id: Uuid::now_v7(),
            buyer_id: record.buyer_id,
            seller_id: record.seller_id,
            details: record.details,
            history: StatusHistory::new(record.initial),
            message: record.message,
            admin_note: None,
            seller_response: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.state
            .write()
            .await
            .quotes
            .insert(quote.id, quote.clone());
        Ok(quote)
    }

    async fn find_quote(&self, id: Uuid) -> Result<Option<QuoteRequest>> {
        Ok(self.state.read().await.quotes.get(&id).cloned())
    }

    async fn find_quote_with_seller(&self, id: Uuid) -> Result<Option<QuoteWithSeller>> {
        let state = self.state.read().await;
        let Some(quote) = state.quotes.get(&id) else {
            return Ok(None);
        };

        let seller = state.accounts.get(&quote.seller_id).cloned().ok_or_else(|| {
            Error::reference_integrity()
                .with_message(format!("seller {} of quote {id} is missing", quote.seller_id))
        })?;

        Ok(Some(QuoteWithSeller {
            quote: quote.clone(),
            seller,
        }))
    }

    async fn append_status(
        &self,
        id: Uuid,
        expected_version: i64,
        entry: StatusEntry,
    ) -> Result<QuoteRequest> {
        let mut state = self.state.write().await;
        let quote = state
            .quotes
            .get_mut(&id)
            .ok_or_else(|| Error::not_found().with_message(format!("quote {id} not found")))?;

        if quote.version != expected_version {
            return Err(Error::conflict().with_message(format!(
                "quote {id} was modified concurrently (expected version {expected_version}, found {})",
                quote.version
            )));
        }

        quote.updated_at = entry.date;
        quote.history.push(entry);
        quote.version += 1;
        Ok(quote.clone())
    }

    async fn save_seller_response(
        &self,
        id: Uuid,
        response: SellerResponse,
    ) -> Result<QuoteRequest> {
        let mut state = self.state.write().await;
        let quote = state
            .quotes
            .get_mut(&id)
            .ok_or_else(|| Error::not_found().with_message(format!("quote {id} not found")))?;

        quote.updated_at = response.responded_at;
        quote.seller_response = Some(response);
        Ok(quote.clone())
    }

    async fn delete_quote(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.write().await.quotes.remove(&id).is_some())
    }

    async fn list_quotes(
        &self,
        filter: &QuoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<QuoteRequest>, u64)> {
        let state = self.state.read().await;
        let mut matching: Vec<_> = state
            .quotes
            .values()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(paginate(matching, page))
    }

    async fn quote_facets(&self, filter: &QuoteFilter) -> Result<Vec<QuoteFacet>> {
        let state = self.state.read().await;
        Ok(state
            .quotes
            .values()
            .filter(|quote| filter.matches(quote))
            .map(QuoteFacet::from)
            .collect())
    }
}

#[async_trait::async_trait]
impl DealStore for MemoryStore {
    async fn insert_deal(&self, record: NewDealRecord) -> Result<BestDeal> {
        let now = Timestamp::now();
        let deal = BestDeal {
            id: Uuid::now_v7(),
            product_id: record.product_id,
            seller_id: record.seller_id,
            created_by: record.created_by,
            offer_price: record.offer_price,
            validity: record.validity,
            status: DealStatus::Pending,
            admin_note: None,
            created_at: now,
            updated_at: now,
        };

        self.state
            .write()
            .await
            .deals
            .insert(deal.id, deal.clone());
        self.deal_writes.fetch_add(1, Ordering::SeqCst);
        Ok(deal)
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<BestDeal>> {
        Ok(self.state.read().await.deals.get(&id).cloned())
    }

    async fn find_deal_for(&self, product_id: Uuid, seller_id: Uuid) -> Result<Option<BestDeal>> {
        let state = self.state.read().await;
        Ok(state
            .deals
            .values()
            .find(|d| d.product_id == product_id && d.seller_id == seller_id)
            .cloned())
    }

    async fn update_deal(&self, id: Uuid, changes: DealChanges) -> Result<BestDeal> {
        let mut state = self.state.write().await;
        let deal = state
            .deals
            .get_mut(&id)
            .ok_or_else(|| Error::not_found().with_message(format!("best deal {id} not found")))?;

        if let Some(offer_price) = changes.offer_price {
            deal.offer_price = offer_price;
        }
        if let Some(validity) = changes.validity {
            deal.validity = validity;
        }
        if let Some(status) = changes.status {
            deal.status = status;
        }
        if let Some(admin_note) = changes.admin_note {
            deal.admin_note = admin_note;
        }
        deal.updated_at = Timestamp::now();

        self.deal_writes.fetch_add(1, Ordering::SeqCst);
        Ok(deal.clone())
    }

    async fn delete_deal(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.write().await.deals.remove(&id).is_some())
    }

    async fn list_deals(
        &self,
        filter: &DealFilter,
        page: PageRequest,
    ) -> Result<(Vec<BestDeal>, u64)> {
        let state = self.state.read().await;
        let mut matching: Vec<_> = state
            .deals
            .values()
            .filter(|deal| filter.matches(deal))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(paginate(matching, page))
    }

    async fn deal_facets(&self) -> Result<Vec<DealFacet>> {
        let state = self.state.read().await;
        Ok(state
            .deals
            .values()
            .map(|deal| DealFacet {
                status: deal.status,
                created_at: deal.created_at,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn find_product_owner(&self, product_id: Uuid) -> Result<Option<ProductOwner>> {
        Ok(self.state.read().await.products.get(&product_id).cloned())
    }
}

#[async_trait::async_trait]
impl NotificationSink for MemoryStore {
    async fn emit(&self, notification: NewNotification) -> Result<()> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(Error::internal().with_message("notification sink unavailable"));
        }

        self.state.write().await.notifications.push(notification);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DashboardCache for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_cache.load(Ordering::SeqCst) {
            return Err(Error::internal().with_message("cache unavailable"));
        }

        let state = self.state.read().await;
        Ok(state
            .cache
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        if self.fail_cache.load(Ordering::SeqCst) {
            return Err(Error::internal().with_message("cache unavailable"));
        }

        let expires_at = Instant::now() + ttl;
        self.state
            .write()
            .await
            .cache
            .insert(key.to_owned(), (value, expires_at));
        Ok(())
    }
}
