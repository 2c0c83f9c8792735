// THEORY:
// The `CloudGestureClient` is an alternate producer of the same `HandData`
// contract the local motion pipeline emits. Instead of differencing frames it
// ships one JPEG to a generative vision endpoint and asks the model what the
// hand is doing. It exists for hosts without the compute or the lighting for
// reliable local differencing.
//
// Key architectural principles:
// 1.  **Same Contract, Different Producer**: Consumers cannot tell which
//     producer a reading came from. The client is never wired into the
//     controller; callers hold an `Option<CloudGestureClient>` and an absent
//     client means analysis degrades to the neutral reading immediately.
// 2.  **Failure Collapses To Neutral**: Network errors, bad status codes,
//     malformed JSON and missing fields all produce `HandData::neutral()`.
//     The error machinery stays internal; the public method cannot fail.
// 3.  **Defensive Parsing**: The reply schema is requested explicitly, but the
//     parser still treats every field as optional and every unknown state
//     string as `None`.

use crate::core_modules::gesture::{HandData, HandState};
use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, RgbaImage};
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const JPEG_QUALITY: u8 = 80;

const ANALYSIS_PROMPT: &str = "Look at the person in this image. Report their \
most prominent hand as one of OPEN, CLOSED, POINTING or NONE, and its position \
in the image as normalized x and y coordinates between 0 and 1.";

/// A vision-model producer of hand readings.
pub struct CloudGestureClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl CloudGestureClient {
    /// Builds a client for the given API key. Construction is explicit; there
    /// is no ambient global and no environment lookup.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Analyzes one captured frame. Always returns a reading; every failure
    /// path yields `HandData::neutral()`.
    pub async fn analyze_hand(&self, frame: &RgbaImage) -> HandData {
        match self.request_analysis(frame).await {
            Ok(reading) => reading,
            Err(_) => HandData::neutral(),
        }
    }

    async fn request_analysis(&self, frame: &RgbaImage) -> Result<HandData> {
        let encoded = encode_jpeg(frame)?;

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let payload = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": encoded } },
                    { "text": ANALYSIS_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "state": { "type": "STRING" },
                        "position": {
                            "type": "OBJECT",
                            "properties": {
                                "x": { "type": "NUMBER" },
                                "y": { "type": "NUMBER" }
                            }
                        }
                    }
                }
            }
        });

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow!("vision endpoint status: {}", res.status()));
        }

        let body: Value = res.json().await?;
        let text = extract_text(&body).context("no text in vision response")?;
        Ok(parse_reading(&text))
    }
}

fn encode_jpeg(frame: &RgbaImage) -> Result<String> {
    // JPEG has no alpha channel, so flatten first.
    let rgb = DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder.write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(STANDARD.encode(bytes))
}

fn extract_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

#[derive(Debug, Deserialize)]
struct GestureReply {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    position: Option<ReplyPosition>,
}

#[derive(Debug, Deserialize)]
struct ReplyPosition {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

/// Maps the model's JSON reply onto a reading, defaulting each missing or
/// unrecognized piece independently.
fn parse_reading(text: &str) -> HandData {
    let reply: GestureReply = match serde_json::from_str(text) {
        Ok(reply) => reply,
        Err(_) => return HandData::neutral(),
    };

    let state = match reply.state.as_deref() {
        Some("OPEN") => HandState::Open,
        Some("CLOSED") => HandState::Closed,
        Some("POINTING") => HandState::Pointing,
        _ => HandState::None,
    };

    let (x, y) = match reply.position {
        Some(position) => (position.x.unwrap_or(0.5), position.y.unwrap_or(0.5)),
        None => (0.5, 0.5),
    };

    HandData { state, x, y }
}
