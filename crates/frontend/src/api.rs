use quake_shared::feed::{self, Decoded, Earthquake, PlateBoundary};

/// GET a feed and return its body. Non-success statuses are errors.
async fn fetch_body(url: &str) -> Result<String, String> {
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    resp.text().await.map_err(|e| e.to_string())
}

fn log_decoded<T>(feed_name: &str, url: &str, decoded: &Decoded<T>) {
    tracing::info!(feed = feed_name, url, features = decoded.items.len(), "Loaded feed");
    if decoded.skipped > 0 {
        tracing::debug!(
            feed = feed_name,
            skipped = decoded.skipped,
            "Skipped features without usable geometry"
        );
    }
}

pub async fn fetch_earthquakes(url: &str) -> Result<Vec<Earthquake>, String> {
    let body = fetch_body(url).await?;
    let decoded = feed::parse_earthquakes(&body)?;
    log_decoded("earthquakes", url, &decoded);
    Ok(decoded.items)
}

pub async fn fetch_plate_boundaries(url: &str) -> Result<Vec<PlateBoundary>, String> {
    let body = fetch_body(url).await?;
    let decoded = feed::parse_plate_boundaries(&body)?;
    log_decoded("plates", url, &decoded);
    Ok(decoded.items)
}
