//! Remote leaderboard over HTTP
//!
//! - `GET  {base}/scores/is-in-top-10?score=<n>` -> `{ "isInTop10": bool }`
//! - `POST {base}/scores/sort` `{ "username", "score" }` -> `{ "results": [...], "rank": n }`
//!
//! The transport is the browser's `fetch`; native builds have no HTTP client
//! and report every call as failed.

use serde::{Deserialize, Serialize};

use super::{Leaderboard, LeaderboardEntry, Standings};

/// Body of the top-10 check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCheckResponse {
    #[serde(rename = "isInTop10")]
    pub is_in_top10: bool,
}

/// Body of a submit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest<'a> {
    pub username: &'a str,
    pub score: u64,
}

/// Body of a submit response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub results: Vec<LeaderboardEntry>,
    pub rank: u32,
}

impl From<SubmitResponse> for Standings {
    fn from(response: SubmitResponse) -> Self {
        Standings {
            results: response.results,
            rank: response.rank,
        }
    }
}

/// Leaderboard service client
#[derive(Debug, Clone)]
pub struct HttpLeaderboard {
    base_url: String,
}

impl HttpLeaderboard {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn top_check_url(&self, score: u64) -> String {
        format!("{}/scores/is-in-top-10?score={}", self.base_url, score)
    }

    pub fn submit_url(&self) -> String {
        format!("{}/scores/sort", self.base_url)
    }
}

/// Encode a submit body
pub fn encode_submit(entry: &LeaderboardEntry) -> anyhow::Result<String> {
    let request = SubmitRequest {
        username: &entry.username,
        score: entry.score,
    };
    Ok(serde_json::to_string(&request)?)
}

#[cfg(target_arch = "wasm32")]
mod transport {
    use anyhow::{Context, anyhow, bail};
    use serde::de::DeserializeOwned;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    fn js_err(value: JsValue) -> anyhow::Error {
        anyhow!("{:?}", value)
    }

    /// Send `request` and decode its JSON body
    pub async fn fetch_json<T: DeserializeOwned>(request: &Request) -> anyhow::Result<T> {
        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(js_err)
            .context("leaderboard request failed")?;
        let response: Response = value.dyn_into().map_err(js_err)?;
        if !response.ok() {
            bail!("leaderboard HTTP {}", response.status());
        }
        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)
            .context("reading leaderboard response")?;
        let text = text
            .as_string()
            .ok_or_else(|| anyhow!("leaderboard response is not text"))?;
        serde_json::from_str(&text).context("decoding leaderboard response")
    }

    pub fn get(url: &str) -> anyhow::Result<Request> {
        let init = RequestInit::new();
        init.set_method("GET");
        Request::new_with_str_and_init(url, &init).map_err(js_err)
    }

    pub fn post_json(url: &str, body: &str) -> anyhow::Result<Request> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(body));
        let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        Ok(request)
    }
}

#[cfg(target_arch = "wasm32")]
impl Leaderboard for HttpLeaderboard {
    async fn is_in_top(&mut self, score: u64) -> anyhow::Result<bool> {
        let request = transport::get(&self.top_check_url(score))?;
        let body: TopCheckResponse = transport::fetch_json(&request).await?;
        Ok(body.is_in_top10)
    }

    async fn submit(&mut self, entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
        let body = encode_submit(entry)?;
        let request = transport::post_json(&self.submit_url(), &body)?;
        let response: SubmitResponse = transport::fetch_json(&request).await?;
        Ok(response.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Leaderboard for HttpLeaderboard {
    async fn is_in_top(&mut self, _score: u64) -> anyhow::Result<bool> {
        anyhow::bail!("no HTTP transport for {} on this platform", self.base_url)
    }

    async fn submit(&mut self, _entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
        anyhow::bail!("no HTTP transport for {} on this platform", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let board = HttpLeaderboard::new("https://scores.example/");
        assert_eq!(
            board.top_check_url(42),
            "https://scores.example/scores/is-in-top-10?score=42"
        );
        assert_eq!(board.submit_url(), "https://scores.example/scores/sort");
    }

    #[test]
    fn test_decode_top_check() {
        let body: TopCheckResponse = serde_json::from_str(r#"{"isInTop10":true}"#).unwrap();
        assert!(body.is_in_top10);
    }

    #[test]
    fn test_encode_submit() {
        let json = encode_submit(&LeaderboardEntry::new("AAA", 17)).unwrap();
        assert_eq!(json, r#"{"username":"AAA","score":17}"#);
    }

    #[test]
    fn test_decode_submit_response() {
        let json = r#"{
            "results": [
                {"username": "ZED", "score": 900},
                {"username": "AAA", "score": 17}
            ],
            "rank": 2
        }"#;
        let standings: Standings = serde_json::from_str::<SubmitResponse>(json).unwrap().into();
        assert_eq!(standings.rank, 2);
        assert_eq!(standings.results[0], LeaderboardEntry::new("ZED", 900));
        assert_eq!(standings.results.len(), 2);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_transport_reports_failure() {
        let mut board = HttpLeaderboard::new("https://scores.example");
        assert!(pollster::block_on(board.is_in_top(5)).is_err());
    }
}
