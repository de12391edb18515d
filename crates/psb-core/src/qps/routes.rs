use std::sync::Arc;

use psb_model::RouteKind;
use psb_store::{Store, new_key};

use crate::error::{CoreError, CoreResult};

/// One worker's view of a route: the store handle, the fixed key and the payload it exercises.
pub(crate) struct RouteTest {
    route: RouteKind,
    store: Arc<dyn Store>,
    key: String,
    payload_size: usize,
}

impl RouteTest {
    /// Populate whatever the route reads before the timed loop starts.
    pub(crate) async fn prepare(
        route: RouteKind,
        store: Arc<dyn Store>,
        payload_size: usize,
    ) -> CoreResult<Self> {
        let test = Self {
            route,
            store,
            key: new_key(),
            payload_size: if route.uses_payload() { payload_size } else { 0 },
        };
        match route {
            RouteKind::Get | RouteKind::Exists | RouteKind::Evict => test.populate().await?,
            RouteKind::Set | RouteKind::Endpoint => {}
        }
        Ok(test)
    }

    /// Issue the single timed store operation of this route.
    pub(crate) async fn query(&self) -> CoreResult<()> {
        match self.route {
            RouteKind::Get => {
                self.store
                    .get(&self.key)
                    .await?
                    .ok_or_else(|| CoreError::MissingKey(self.key.clone()))?;
            }
            RouteKind::Set => {
                // same key every time so the store does not accumulate entries
                self.store
                    .set(&self.key, vec![0u8; self.payload_size])
                    .await?;
            }
            RouteKind::Exists => {
                self.store.exists(&self.key).await?;
            }
            RouteKind::Evict => self.store.evict(&self.key).await?,
            RouteKind::Endpoint => {
                self.store.endpoint_info().await?;
            }
        }
        Ok(())
    }

    /// Untimed work between two queries.
    pub(crate) async fn reset(&self) -> CoreResult<()> {
        if self.route == RouteKind::Evict {
            self.populate().await?;
        }
        Ok(())
    }

    /// Remove the key this test wrote.
    pub(crate) async fn cleanup(&self) -> CoreResult<()> {
        if self.route != RouteKind::Endpoint {
            self.store.evict(&self.key).await?;
        }
        Ok(())
    }

    async fn populate(&self) -> CoreResult<()> {
        self.store
            .set(&self.key, vec![0u8; self.payload_size])
            .await?;
        Ok(())
    }
}
