use super::{ChromeDriver, PageDriver, RenderError, WaitCondition};
use crate::config::RenderConfig;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// A fixed set of browser instances shared by every chapter
///
/// A render checks out one instance under a semaphore permit, drives it on a
/// blocking thread, and checks it back in when the render returns. No two
/// renders ever hold the same instance, and at most `size` renders run at once.
#[derive(Clone)]
pub struct RenderPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    idle: Mutex<Vec<Box<dyn PageDriver>>>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl PoolInner {
    fn checkout(self: &Arc<Self>) -> Option<CheckedOut> {
        let driver = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()?;
        Some(CheckedOut {
            driver: Some(driver),
            pool: Arc::clone(self),
        })
    }
}

/// Returns its driver to the pool when dropped, even if the render panicked
struct CheckedOut {
    driver: Option<Box<dyn PageDriver>>,
    pool: Arc<PoolInner>,
}

impl Drop for CheckedOut {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            self.pool
                .idle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(driver);
        }
    }
}

impl RenderPool {
    /// Builds a pool over the given drivers; its size is the number of drivers
    pub fn new(drivers: Vec<Box<dyn PageDriver>>) -> Self {
        let size = drivers.len();
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(drivers),
                permits: Arc::new(Semaphore::new(size)),
                size,
            }),
        }
    }

    /// Builds a pool of `pool-size` Chrome instances, launched on first use
    pub fn chrome(config: &RenderConfig) -> Self {
        let drivers = (0..config.pool_size)
            .map(|_| Box::new(ChromeDriver::new(config)) as Box<dyn PageDriver>)
            .collect();
        Self::new(drivers)
    }

    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Instances not currently rendering
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Renders `url` on a pooled instance
    ///
    /// Waiting for a free instance is not covered by `page_timeout`; only the
    /// render itself is. When the timeout fires the render keeps running on
    /// its blocking thread and the instance returns to the pool once it ends.
    pub async fn render(
        &self,
        url: Url,
        wait: WaitCondition,
        page_timeout: Duration,
    ) -> Result<String, RenderError> {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| RenderError::PoolClosed)?;

        let inner = Arc::clone(&self.inner);
        let task_url = url.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let mut checked_out = inner
                .checkout()
                .ok_or_else(|| RenderError::Worker("no idle browser instance".to_string()))?;
            match checked_out.driver.as_mut() {
                Some(driver) => driver.render(&task_url, &wait),
                None => Err(RenderError::Worker("browser instance missing".to_string())),
            }
        });

        match tokio::time::timeout(page_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RenderError::Worker(join_error.to_string())),
            Err(_) => Err(RenderError::Timeout(format!(
                "{} after {}s",
                url,
                page_timeout.as_secs()
            ))),
        }
    }

    /// Stops handing out instances; pending and future renders fail with `PoolClosed`
    pub fn close(&self) {
        self.inner.permits.close();
    }
}
