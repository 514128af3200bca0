use std::path::PathBuf;
use std::time::Duration;

use artemis_core::config::{Credentials, SiteUrls};
use artemis_core::error::AppError;
use artemis_core::scanner::JOB_LINK_SELECTOR;
use artemis_core::traits::{Fetcher, PageProbe};
use artemis_core::wait::{PageState, WaitCondition, poll_until};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// How long login may sit on a security challenge before we carry on anyway.
pub const SECURITY_CHALLENGE_TIMEOUT: Duration = Duration::from_secs(300);
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const RESULTS_WAIT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

const USERNAME_SELECTOR: &str = "#username";
const PASSWORD_SELECTOR: &str = "#password";
const SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;

/// One headless Chromium with a single tab, owned for the whole run.
///
/// Every [`Fetcher::fetch`] navigates that same tab, so cookies from
/// [`login`](Self::login) carry over to the listing pages.
///
/// # Example
///
/// ```rust,no_run
/// use artemis_client::BrowserSession;
/// use artemis_core::traits::Fetcher;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let session = BrowserSession::launch().await?;
/// let html = session.fetch("https://example.com").await?;
/// println!("{}", &html[..html.len().min(200)]);
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launches headless Chromium with a **30 s** navigation timeout.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH`, `CHROME_BIN`,
    /// or one of the well-known install locations.
    pub async fn launch() -> Result<Self, AppError> {
        Self::with_timeout(NAVIGATION_TIMEOUT).await
    }

    pub async fn with_timeout(navigation_timeout: Duration) -> Result<Self, AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        // The snap wrapper at /snap/bin/chromium strips unknown flags and
        // breaks headless mode, so prefer the real binary when we can find it.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .build()
            .map_err(|e| AppError::ConfigError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::ConfigError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to open tab: {e}")))?;

        Ok(Self {
            browser,
            page,
            handler,
            navigation_timeout,
        })
    }

    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Sign in through the site's login form.
    ///
    /// After submitting, waits up to [`SECURITY_CHALLENGE_TIMEOUT`] for the
    /// browser to land on the post-login URL. If a security challenge is never
    /// cleared the wait gives up quietly and the run continues. Targets without
    /// a login URL are a no-op.
    pub async fn login(&self, credentials: &Credentials, urls: &SiteUrls) -> Result<(), AppError> {
        let Some(login_url) = urls.login_url else {
            return Ok(());
        };

        tracing::info!(username = %credentials.username, "Logging in");
        self.navigate(login_url).await?;

        self.type_into(USERNAME_SELECTOR, &credentials.username).await?;
        self.type_into(PASSWORD_SELECTOR, &credentials.password).await?;
        self.page
            .find_element(SUBMIT_SELECTOR)
            .await
            .map_err(|e| AppError::BrowserError(format!("Login submit button not found: {e}")))?
            .click()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to submit login form: {e}")))?;

        let Some(prefix) = urls.post_login_prefix else {
            return Ok(());
        };
        let landed = WaitCondition::UrlPrefix(prefix.to_string());
        match poll_until(self, &landed, SECURITY_CHALLENGE_TIMEOUT, POLL_INTERVAL).await {
            Ok(()) => tracing::info!("Logged in"),
            Err(AppError::Timeout(secs)) => {
                tracing::warn!(secs, "Security challenge not cleared in time, continuing");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shut the browser down and stop the CDP handler.
    pub async fn close(mut self) -> Result<(), AppError> {
        self.browser
            .close()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to close browser: {e}")))?;
        match self.browser.wait().await {
            Ok(status) => tracing::debug!(?status, "Browser process exited"),
            Err(e) => tracing::debug!(error = %e, "Could not reap browser process"),
        }
        self.handler.abort();
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), AppError> {
        let result = tokio::time::timeout(self.navigation_timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| AppError::BrowserError(format!("Failed to navigate to {url}: {e}")))?
                .wait_for_navigation()
                .await
                .map_err(|e| AppError::BrowserError(format!("Navigation to {url} failed: {e}")))?;
            Ok::<(), AppError>(())
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(AppError::timeout(self.navigation_timeout)),
        }
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), AppError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| AppError::BrowserError(format!("Element {selector} not found: {e}")))?
            .click()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to focus {selector}: {e}")))?
            .type_str(text)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to type into {selector}: {e}")))?;
        Ok(())
    }
}

impl PageProbe for BrowserSession {
    async fn state(&self) -> Result<PageState, AppError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to read page URL: {e}")))?
            .unwrap_or_default();
        let html = self
            .page
            .content()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to read page content: {e}")))?;
        Ok(PageState { url, html })
    }
}

impl Fetcher for BrowserSession {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.navigate(url).await?;

        // Results render client-side; give them a bounded moment to appear.
        // An empty page past the end of results is expected, so a timeout here
        // is not an error.
        let results = WaitCondition::SelectorExists(JOB_LINK_SELECTOR.to_string());
        match poll_until(self, &results, RESULTS_WAIT_TIMEOUT, POLL_INTERVAL).await {
            Ok(()) | Err(AppError::Timeout(_)) => {}
            Err(e) => return Err(e),
        }

        self.page
            .content()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to read page content: {e}")))
    }
}
