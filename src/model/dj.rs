//! AI DJ recommendation gateway
//!
//! Maps a free-text mood onto catalog tracks through the Gemini JSON
//! endpoint. The gateway is total: every call resolves to a usable
//! `Recommendation`, falling back to a fixed narrative plus the first two
//! catalog tracks on any failure. Missing credentials count as a failure
//! too; running without a key is an expected configuration, not an error.

use anyhow::{anyhow, Result};
use serde::Deserialize;

use super::catalog::Track;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

const FALLBACK_TEXT: &str =
    "I couldn't quite catch that vibe. Here's a mix to get you started instead!";

/// Narrative plus the catalog tracks that match it. Every track here is
/// guaranteed to come from the caller's own catalog.
#[derive(Clone, Debug)]
pub struct Recommendation {
    pub text: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DjPayload {
    description: String,
    recommended_track_ids: Vec<String>,
}

#[derive(Clone)]
pub struct DjClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl DjClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, the AI DJ will answer with the fallback mix");
        }
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Never errors to the caller.
    pub async fn recommend(&self, mood: &str, catalog: &[Track]) -> Recommendation {
        match self.request(mood, catalog).await {
            Ok(payload) => {
                let tracks = resolve_tracks(&payload.recommended_track_ids, catalog);
                tracing::info!(mood, count = tracks.len(), "AI DJ produced a recommendation");
                Recommendation {
                    text: payload.description,
                    tracks,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "AI DJ request failed, serving fallback");
                fallback(catalog)
            }
        }
    }

    async fn request(&self, mood: &str, catalog: &[Track]) -> Result<DjPayload> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("missing API key"))?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(mood, catalog) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "description": { "type": "STRING" },
                        "recommendedTrackIds": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["description", "recommendedTrackIds"]
                }
            }
        });

        let response: serde_json::Value = self
            .http
            .post(GEMINI_ENDPOINT)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&response)
    }
}

fn build_prompt(mood: &str, catalog: &[Track]) -> String {
    let track_list = catalog
        .iter()
        .map(|t| {
            format!(
                "{} by {} (ID: {}, Genre: {})",
                t.title,
                t.artist,
                t.id,
                t.genre.as_deref().unwrap_or("Unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert music DJ. The user is in this mood: \"{mood}\".\n\n\
         Here is the list of available tracks in the library:\n{track_list}\n\n\
         1. Select 2-3 tracks from the available list that best match the mood.\n\
         2. Write a short, engaging description of why these tracks fit the vibe.\n\
         3. Return the response in JSON format containing the description and the list of selected Track IDs."
    )
}

fn parse_response(response: &serde_json::Value) -> Result<DjPayload> {
    let text = response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow!("empty model response"))?;
    Ok(serde_json::from_str(text)?)
}

/// Ids the catalog doesn't know are dropped silently: the gateway never
/// hands back a track the caller hasn't seen before.
fn resolve_tracks(ids: &[String], catalog: &[Track]) -> Vec<Track> {
    catalog
        .iter()
        .filter(|t| ids.contains(&t.id))
        .cloned()
        .collect()
}

fn fallback(catalog: &[Track]) -> Recommendation {
    Recommendation {
        text: FALLBACK_TEXT.to_string(),
        tracks: catalog.iter().take(2).cloned().collect(),
    }
}
