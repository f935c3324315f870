//! [`LocalStore`]: the key-value backed [`ReferenceRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{AdminConfig, StoreLatency};
use crate::constants::{UNKNOWN_FUND, storage_keys};
use crate::error::{AdminError, Result};
use crate::store::ReferenceRepository;
use crate::store::kv::{FileKv, KvBackend, MemoryKv};
use crate::types::fund::{MutualFund, NewFund};
use crate::types::page::LocalPage;
use crate::types::scheme::{NewScheme, Scheme};

/// Fund and scheme collections over a [`KvBackend`].
///
/// Every operation first sleeps for the configured [`StoreLatency`] to
/// behave like a remote call. Mutations are serialized by an internal lock
/// so concurrent read-modify-write cycles do not lose records.
///
/// # Example
///
/// ```no_run
/// use mf_admin::store::{LocalStore, ReferenceRepository};
/// use mf_admin::types::fund::NewFund;
///
/// # #[tokio::main]
/// # async fn main() -> mf_admin::Result<()> {
/// let store = LocalStore::in_memory();
/// let fund = store
///     .create_fund(NewFund {
///         name: "Bluechip Advantage".into(),
///         amc_name: "HDFC Asset Management".into(),
///         ..Default::default()
///     })
///     .await?;
/// assert_eq!(store.list_funds(1, 10).await?.data[0].id, fund.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KvBackend>,
    latency: StoreLatency,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KvBackend>, latency: StoreLatency) -> Self {
        Self {
            kv,
            latency,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-process store without artificial latency.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKv::new()), StoreLatency::none())
    }

    /// File-backed store in the configured data directory.
    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(Arc::new(FileKv::new(&config.data_dir)), config.latency)
    }

    // -----------------------------------------------------------------------
    // Collection helpers
    // -----------------------------------------------------------------------

    /// Read a collection for display. Missing or corrupt collections read
    /// as empty.
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.load_strict(key).await {
            Err(AdminError::Json(err)) => {
                tracing::warn!(key, error = %err, "unreadable collection shown as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Read a collection that is about to be rewritten. Unreadable text is
    /// an error so it is never overwritten.
    async fn load_strict<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.kv.get(key).await? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, items: &[T]) -> Result<()> {
        self.kv.set(key, serde_json::to_string(items)?).await
    }

    async fn pause(&self, delay: std::time::Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Replace the record whose id matches, or fail with `NotFound`.
    fn replace<T>(
        items: &mut [T],
        id: &str,
        entity: &'static str,
        record: T,
        id_of: impl Fn(&T) -> &str,
    ) -> Result<()> {
        let slot = items
            .iter_mut()
            .find(|item| id_of(item) == id)
            .ok_or_else(|| AdminError::not_found(entity, id))?;
        *slot = record;
        Ok(())
    }
}

/// Fill in `fund_name` from the fund list.
fn enrich(mut scheme: Scheme, funds: &[MutualFund]) -> Scheme {
    let name = funds
        .iter()
        .find(|fund| fund.id == scheme.fund_id)
        .map_or(UNKNOWN_FUND, |fund| fund.name.as_str());
    scheme.fund_name = Some(name.to_owned());
    scheme
}

fn fund_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn scheme_id() -> String {
    format!("s{}", Uuid::new_v4().simple())
}

#[async_trait]
impl ReferenceRepository for LocalStore {
    async fn list_funds(&self, page: u32, limit: u32) -> Result<LocalPage<MutualFund>> {
        self.pause(self.latency.list).await;
        let funds = self.load(storage_keys::FUNDS).await?;
        Ok(LocalPage::slice(funds, page, limit))
    }

    async fn get_fund(&self, id: &str) -> Result<MutualFund> {
        self.pause(self.latency.list).await;
        self.load::<MutualFund>(storage_keys::FUNDS)
            .await?
            .into_iter()
            .find(|fund| fund.id == id)
            .ok_or_else(|| AdminError::not_found("fund", id))
    }

    async fn create_fund(&self, fund: NewFund) -> Result<MutualFund> {
        fund.validate()?;
        self.pause(self.latency.create).await;
        let _guard = self.write_lock.lock().await;

        let mut funds: Vec<MutualFund> = self.load_strict(storage_keys::FUNDS).await?;
        let fund = fund.into_fund(fund_id());
        funds.insert(0, fund.clone());
        self.save(storage_keys::FUNDS, &funds).await?;

        tracing::debug!(id = %fund.id, name = %fund.name, "fund created");
        Ok(fund)
    }

    async fn update_fund(&self, fund: MutualFund) -> Result<MutualFund> {
        NewFund::from(fund.clone()).validate()?;
        self.pause(self.latency.create).await;
        let _guard = self.write_lock.lock().await;

        let mut funds: Vec<MutualFund> = self.load_strict(storage_keys::FUNDS).await?;
        let id = fund.id.clone();
        Self::replace(&mut funds, &id, "fund", fund.clone(), |f| f.id.as_str())?;
        self.save(storage_keys::FUNDS, &funds).await?;
        Ok(fund)
    }

    async fn delete_fund(&self, id: &str) -> Result<()> {
        self.pause(self.latency.list).await;
        let _guard = self.write_lock.lock().await;

        let mut funds: Vec<MutualFund> = self.load_strict(storage_keys::FUNDS).await?;
        let mut schemes: Vec<Scheme> = self.load_strict(storage_keys::SCHEMES).await?;
        funds.retain(|fund| fund.id != id);
        let before = schemes.len();
        schemes.retain(|scheme| scheme.fund_id != id);
        self.save(storage_keys::FUNDS, &funds).await?;
        self.save(storage_keys::SCHEMES, &schemes).await?;

        tracing::debug!(id, schemes_removed = before - schemes.len(), "fund deleted");
        Ok(())
    }

    async fn list_schemes(&self, page: u32, limit: u32) -> Result<LocalPage<Scheme>> {
        self.pause(self.latency.list).await;
        let funds: Vec<MutualFund> = self.load(storage_keys::FUNDS).await?;
        let schemes: Vec<Scheme> = self.load(storage_keys::SCHEMES).await?;
        let enriched = schemes.into_iter().map(|s| enrich(s, &funds)).collect();
        Ok(LocalPage::slice(enriched, page, limit))
    }

    async fn get_scheme(&self, id: &str) -> Result<Scheme> {
        self.pause(self.latency.list).await;
        let funds: Vec<MutualFund> = self.load(storage_keys::FUNDS).await?;
        self.load::<Scheme>(storage_keys::SCHEMES)
            .await?
            .into_iter()
            .find(|scheme| scheme.id == id)
            .map(|scheme| enrich(scheme, &funds))
            .ok_or_else(|| AdminError::not_found("scheme", id))
    }

    async fn create_scheme(&self, scheme: NewScheme) -> Result<Scheme> {
        scheme.validate()?;
        self.pause(self.latency.create).await;
        let _guard = self.write_lock.lock().await;

        let mut schemes: Vec<Scheme> = self.load_strict(storage_keys::SCHEMES).await?;
        let scheme = scheme.into_scheme(scheme_id());
        schemes.insert(0, scheme.clone());
        self.save(storage_keys::SCHEMES, &schemes).await?;

        tracing::debug!(id = %scheme.id, fund_id = %scheme.fund_id, "scheme created");
        Ok(scheme)
    }

    async fn update_scheme(&self, mut scheme: Scheme) -> Result<Scheme> {
        NewScheme::from(scheme.clone()).validate()?;
        self.pause(self.latency.create).await;
        let _guard = self.write_lock.lock().await;

        // The enrichment is never persisted.
        scheme.fund_name = None;
        let mut schemes: Vec<Scheme> = self.load_strict(storage_keys::SCHEMES).await?;
        let id = scheme.id.clone();
        Self::replace(&mut schemes, &id, "scheme", scheme.clone(), |s| s.id.as_str())?;
        self.save(storage_keys::SCHEMES, &schemes).await?;
        Ok(scheme)
    }

    async fn delete_scheme(&self, id: &str) -> Result<()> {
        self.pause(self.latency.list).await;
        let _guard = self.write_lock.lock().await;

        let mut schemes: Vec<Scheme> = self.load_strict(storage_keys::SCHEMES).await?;
        let before = schemes.len();
        schemes.retain(|scheme| scheme.id != id);
        if schemes.len() == before {
            return Err(AdminError::not_found("scheme", id));
        }
        self.save(storage_keys::SCHEMES, &schemes).await
    }

    async fn clear_all_data(&self) -> Result<()> {
        self.pause(self.latency.clear).await;
        let _guard = self.write_lock.lock().await;
        self.kv.remove(storage_keys::FUNDS).await?;
        self.kv.remove(storage_keys::SCHEMES).await?;
        tracing::info!("local collections cleared");
        Ok(())
    }
}
