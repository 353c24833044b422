use super::{RenderError, RenderPool, WaitCondition};
use crate::address::Address;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::state::RenderStatus;
use std::time::Duration;

/// Markup captured for one page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub chapter: u32,
    pub page: u32,
    /// Empty unless `status` is `Ok`
    pub markup: String,
    pub status: RenderStatus,
    pub attempts: u32,
}

/// Renders page addresses through the pool, retrying transient failures
#[derive(Clone)]
pub struct RenderClient {
    pool: RenderPool,
    page_timeout: Duration,
    retry: RetryPolicy,
}

impl RenderClient {
    pub fn new(pool: RenderPool, page_timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            pool,
            page_timeout,
            retry,
        }
    }

    pub fn pool(&self) -> &RenderPool {
        &self.pool
    }

    /// Renders `address` until the markup is complete or the attempts run out
    ///
    /// Timeouts, navigation errors and malformed markup are all retried with
    /// the configured backoff. Once the budget is spent the page comes back
    /// with status `Failed` and no markup.
    pub async fn render(&self, address: &Address, wait: &WaitCondition) -> RenderedPage {
        let outcome = retry_with_backoff(&self.retry, "render", |attempt| {
            tracing::debug!(
                chapter = address.chapter(),
                page = address.page(),
                attempt,
                "Rendering {}",
                address
            );
            self.render_once(address, wait)
        })
        .await;

        match outcome.result {
            Ok(markup) => RenderedPage {
                chapter: address.chapter(),
                page: address.page(),
                markup,
                status: RenderStatus::Ok,
                attempts: outcome.attempts,
            },
            Err(e) => {
                tracing::warn!(
                    chapter = address.chapter(),
                    page = address.page(),
                    attempts = outcome.attempts,
                    last_status = %RenderStatus::from(&e),
                    "Render of {} failed: {}",
                    address,
                    e
                );
                RenderedPage {
                    chapter: address.chapter(),
                    page: address.page(),
                    markup: String::new(),
                    status: RenderStatus::Failed,
                    attempts: outcome.attempts,
                }
            }
        }
    }

    async fn render_once(
        &self,
        address: &Address,
        wait: &WaitCondition,
    ) -> Result<String, RenderError> {
        let markup = self
            .pool
            .render(address.url().clone(), wait.clone(), self.page_timeout)
            .await?;
        validate_markup(&markup).map_err(|_| RenderError::Malformed(address.to_string()))?;
        Ok(markup)
    }
}

/// Status of captured markup: `Ok` when it carries both root tags, `Malformed` otherwise
///
/// # Examples
///
/// ```
/// use page_mirror::render::validate_markup;
/// use page_mirror::RenderStatus;
///
/// assert!(validate_markup("<html><body></body></html>").is_ok());
/// assert_eq!(validate_markup("<body>partial"), Err(RenderStatus::Malformed));
/// ```
pub fn validate_markup(markup: &str) -> Result<(), RenderStatus> {
    let lower = markup.to_ascii_lowercase();
    if lower.contains("<html") && lower.contains("</html>") {
        Ok(())
    } else {
        Err(RenderStatus::Malformed)
    }
}

impl From<&RenderError> for RenderStatus {
    fn from(error: &RenderError) -> Self {
        match error {
            RenderError::Timeout(_) => RenderStatus::Timeout,
            RenderError::Malformed(_) => RenderStatus::Malformed,
            _ => RenderStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressTemplate;
    use crate::render::PageDriver;
    use crate::retry::Backoff;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Replays a fixed list of outcomes, then keeps failing
    struct ScriptedDriver {
        script: Arc<Mutex<VecDeque<Result<String, RenderError>>>>,
        calls: Arc<AtomicU32>,
    }

    impl PageDriver for ScriptedDriver {
        fn render(&mut self, url: &Url, _wait: &WaitCondition) -> Result<String, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(RenderError::Navigation {
                        url: url.to_string(),
                        message: "script exhausted".to_string(),
                    })
                })
        }
    }

    fn client(script: Vec<Result<String, RenderError>>, attempts: u32) -> (RenderClient, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let driver = ScriptedDriver {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::clone(&calls),
        };
        let pool = RenderPool::new(vec![Box::new(driver)]);
        let client = RenderClient::new(
            pool,
            Duration::from_secs(5),
            RetryPolicy::new(attempts, Backoff::None),
        );
        (client, calls)
    }

    fn address() -> Address {
        AddressTemplate::parse("https://site.test/c{chapter}?page={page}")
            .unwrap()
            .address(1, 2)
            .unwrap()
    }

    fn wait() -> WaitCondition {
        WaitCondition::new("img", Duration::from_secs(1))
    }

    const GOOD: &str = "<html><body><img src=\"a.png\"></body></html>";

    #[tokio::test]
    async fn test_first_attempt_success() {
        let (client, calls) = client(vec![Ok(GOOD.to_string())], 3);
        let page = client.render(&address(), &wait()).await;

        assert_eq!(page.status, RenderStatus::Ok);
        assert_eq!(page.markup, GOOD);
        assert_eq!(page.chapter, 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_then_success() {
        let script = vec![
            Err(RenderError::Timeout("img".to_string())),
            Ok("<body>no root".to_string()),
            Ok(GOOD.to_string()),
        ];
        let (client, calls) = client(script, 4);
        let page = client.render(&address(), &wait()).await;

        assert_eq!(page.status, RenderStatus::Ok);
        assert_eq!(page.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_is_terminal_failure() {
        let script = vec![
            Err(RenderError::Timeout("img".to_string())),
            Err(RenderError::Timeout("img".to_string())),
            Err(RenderError::Timeout("img".to_string())),
            Ok(GOOD.to_string()),
        ];
        let (client, calls) = client(script, 3);
        let page = client.render(&address(), &wait()).await;

        assert_eq!(page.status, RenderStatus::Failed);
        assert!(page.markup.is_empty());
        assert_eq!(page.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_validate_markup_case_insensitive() {
        assert!(validate_markup("<HTML lang=\"ru\"><BODY></BODY></HTML>").is_ok());
        assert!(validate_markup("<html><body>").is_err());
        assert!(validate_markup("").is_err());
    }

    #[test]
    fn test_status_from_error() {
        assert_eq!(
            RenderStatus::from(&RenderError::Timeout("x".to_string())),
            RenderStatus::Timeout
        );
        assert_eq!(
            RenderStatus::from(&RenderError::Malformed("x".to_string())),
            RenderStatus::Malformed
        );
        assert_eq!(
            RenderStatus::from(&RenderError::Launch("x".to_string())),
            RenderStatus::Failed
        );
    }
}
