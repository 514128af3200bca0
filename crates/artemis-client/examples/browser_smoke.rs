/// Smoke-test for `BrowserSession`.
///
/// Launches headless Chromium, fetches a public job-search page, and prints
/// the job ids found on it.
///
/// Run with:
///   cargo run -p artemis-client --example browser_smoke --features browser
use artemis_client::BrowserSession;
use artemis_core::scanner::extract_job_ids;
use artemis_core::traits::Fetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let session = BrowserSession::launch().await?;

    let url = "https://www.linkedin.com/jobs/search/?keywords=rust&start=0";
    println!("Fetching {url} …");
    let html = session.fetch(url).await?;
    assert!(
        html.len() > 500,
        "HTML suspiciously short ({} bytes)",
        html.len()
    );

    let ids = extract_job_ids(&html);
    println!("OK: got {} bytes, {} job ids", html.len(), ids.len());
    for id in ids.iter().take(10) {
        println!("  {id}");
    }

    session.close().await?;
    Ok(())
}
