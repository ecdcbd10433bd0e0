use gloo::net::http::Request;
use tasklet_core::posts::Post;

pub async fn fetch_posts(endpoint: &str) -> Result<Vec<Post>, String> {
    let response = Request::get(endpoint)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.ok() {
        return Err(format!(
            "request failed with status {} {}",
            response.status(),
            response.status_text()
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("failed to read body: {e}"))?;

    serde_json::from_str(&body).map_err(|e| format!("decode error: {e}"))
}
