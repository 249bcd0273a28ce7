//! HTTP dice service client
//!
//! POSTs `{"dice": "2d6+3"}` and expects `{"rolls": [..], "total": n,
//! "modifier": k}`. The async request runs on an owned tokio runtime so the
//! service can sit behind the synchronous `DiceService` trait. Do not call
//! `fetch_roll` from inside another tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::core::error::{Result, SkirmishError};
use crate::dice::{DiceNotation, DiceRoll, DiceService};

/// Request timeout for the dice endpoint
const DICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for a remote dice-rolling endpoint
pub struct HttpDiceService {
    client: Client,
    url: String,
    runtime: Arc<Runtime>,
}

impl HttpDiceService {
    /// Create a client for an explicit endpoint
    pub fn new(url: String, runtime: Arc<Runtime>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DICE_TIMEOUT)
            .build()
            .map_err(|e| SkirmishError::DiceError(e.to_string()))?;
        Ok(Self {
            client,
            url,
            runtime,
        })
    }

    /// Create a client from `DICE_SERVICE_URL`
    pub fn from_env(runtime: Arc<Runtime>) -> Result<Self> {
        let url = std::env::var("DICE_SERVICE_URL")
            .map_err(|_| SkirmishError::DiceError("DICE_SERVICE_URL not set".into()))?;
        Self::new(url, runtime)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, notation: &DiceNotation) -> Result<DiceRoll> {
        let request = RollRequest {
            dice: notation.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SkirmishError::DiceError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SkirmishError::DiceError(format!("API error: {}", error_text)));
        }

        let body: RollResponse = response
            .json()
            .await
            .map_err(|e| SkirmishError::DiceError(e.to_string()))?;

        Ok(DiceRoll {
            rolls: body.rolls,
            total: body.total,
            modifier: body.modifier,
        })
    }
}

impl DiceService for HttpDiceService {
    fn fetch_roll(&self, notation: &DiceNotation) -> Result<DiceRoll> {
        self.runtime.block_on(self.request(notation))
    }
}

#[derive(Serialize)]
struct RollRequest {
    dice: String,
}

#[derive(Deserialize)]
struct RollResponse {
    rolls: Vec<u32>,
    total: i32,
    #[serde(default)]
    modifier: i32,
}
