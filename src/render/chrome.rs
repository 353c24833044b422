use super::{PageDriver, RenderError, WaitCondition};
use crate::config::RenderConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::time::Duration;
use url::Url;

/// Keeps the browser process alive between renders of a slow chapter
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

/// A headless Chrome instance driven through the DevTools protocol
///
/// The browser is launched on first use and relaunched after it stops
/// accepting new tabs. Each render opens a fresh tab and closes it afterwards.
pub struct ChromeDriver {
    headless: bool,
    window_size: (u32, u32),
    args: Vec<String>,
    browser: Option<Browser>,
}

impl ChromeDriver {
    pub fn new(config: &RenderConfig) -> Self {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
        ];
        if let Some(ua) = &config.user_agent {
            args.push(format!("--user-agent={}", ua));
        }

        Self {
            headless: config.headless,
            window_size: (config.window_width, config.window_height),
            args,
            browser: None,
        }
    }

    /// True once a browser process has been started
    pub fn is_launched(&self) -> bool {
        self.browser.is_some()
    }

    fn launch_options(&self) -> Result<LaunchOptions<'_>, RenderError> {
        let args: Vec<&OsStr> = self.args.iter().map(OsStr::new).collect();

        LaunchOptions::default_builder()
            .headless(self.headless)
            .window_size(Some(self.window_size))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(args)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))
    }

    fn launch(&self) -> Result<Browser, RenderError> {
        let options = self.launch_options()?;
        tracing::debug!(headless = self.headless, "Launching browser");
        Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))
    }

    fn load(tab: &Tab, url: &Url, wait: &WaitCondition) -> Result<String, RenderError> {
        tab.set_default_timeout(wait.timeout);

        tab.navigate_to(url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        tab.wait_for_element_with_custom_timeout(&wait.selector, wait.timeout)
            .map_err(|_| RenderError::Timeout(format!("`{}` on {}", wait.selector, url)))?;

        tab.get_content().map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: format!("could not read page content: {}", e),
        })
    }
}

impl PageDriver for ChromeDriver {
    fn render(&mut self, url: &Url, wait: &WaitCondition) -> Result<String, RenderError> {
        if self.browser.is_none() {
            self.browser = Some(self.launch()?);
        }

        let tab = match self.browser.as_ref().map(|browser| browser.new_tab()) {
            Some(Ok(tab)) => tab,
            Some(Err(e)) => {
                // The process is gone or wedged; start over on the next render
                self.browser = None;
                return Err(RenderError::Launch(format!("could not open tab: {}", e)));
            }
            None => return Err(RenderError::Launch("browser not running".to_string())),
        };

        let result = Self::load(&tab, url, wait);
        if let Err(e) = tab.close(true) {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_is_lazy() {
        let driver = ChromeDriver::new(&RenderConfig::default());
        assert!(!driver.is_launched());
    }

    #[test]
    fn test_launch_options_build() {
        let driver = ChromeDriver::new(&RenderConfig::default());
        let options = driver.launch_options();
        assert!(options.is_ok());
    }

    #[test]
    fn test_user_agent_passed_as_flag() {
        let config = RenderConfig {
            user_agent: Some("MirrorBot/1.0".to_string()),
            ..RenderConfig::default()
        };
        let driver = ChromeDriver::new(&config);
        let options = driver.launch_options().unwrap();

        assert!(options
            .args
            .iter()
            .any(|arg| arg.to_string_lossy() == "--user-agent=MirrorBot/1.0"));
    }
}
