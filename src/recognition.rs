use crate::error::CalcError;
use crate::surface::Surface;
use crate::vars::VariableStore;
use base64::{engine::general_purpose, Engine as _};
use egui::Pos2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Environment variable holding the recognition service base URL.
pub const API_URL_ENV: &str = "INKCALC_API_URL";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One parsed unit of the service response, shape-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub expr: String,
    pub value: String,
    pub is_assignment: bool,
}

#[derive(Serialize)]
struct CalcRequest<'a> {
    image: String,
    dict_of_vars: &'a HashMap<String, String>,
}

#[derive(Deserialize)]
struct WireResult {
    expr: String,
    result: String,
    #[serde(default)]
    assign: bool,
}

/// The service answers in two shapes: a `data` array, or one bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Batch { data: Vec<WireResult> },
    Single(WireResult),
}

impl From<WireResult> for RecognitionResult {
    fn from(wire: WireResult) -> Self {
        Self {
            expr: wire.expr,
            value: wire.result,
            is_assignment: wire.assign,
        }
    }
}

/// Normalizes a raw response body into a uniform result sequence, isolating
/// everything downstream from the service's shape inconsistency.
pub fn normalize(body: &str) -> Result<Vec<RecognitionResult>, CalcError> {
    let response: WireResponse =
        serde_json::from_str(body).map_err(|err| CalcError::Protocol(err.to_string()))?;
    Ok(match response {
        WireResponse::Batch { data } => data.into_iter().map(Into::into).collect(),
        WireResponse::Single(single) => vec![single.into()],
    })
}

/// Completed recognition round, delivered back to the UI loop.
#[derive(Debug)]
pub struct RoundOutcome {
    /// Session generation the round was started under. A reset in between
    /// makes the outcome stale; stale outcomes must be discarded unseen.
    pub generation: u64,
    /// Ink bounding-box anchor captured before the request was issued.
    pub anchor: Pos2,
    pub results: Result<Vec<RecognitionResult>, CalcError>,
}

/// Issues recognition rounds on a worker thread so the UI loop never blocks
/// on the network. At most one round is in flight at a time; completed
/// rounds are parked in a slot the UI polls each frame.
pub struct RecognitionClient {
    outcome: Arc<Mutex<Option<RoundOutcome>>>,
    in_flight: Arc<AtomicBool>,
}

impl Default for RecognitionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionClient {
    pub fn new() -> Self {
        Self {
            outcome: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Starts one recognition round for the current surface snapshot and
    /// variable bindings.
    ///
    /// Returns `Ok(false)` when a round is already in flight (the trigger
    /// is ignored). Failures that can be detected before the request leaves
    /// (missing endpoint, snapshot encoding) are returned synchronously and
    /// release the in-flight guard; everything later arrives via `poll`.
    pub fn submit(
        &self,
        surface: &Surface,
        vars: &VariableStore,
        anchor: Pos2,
        generation: u64,
        repaint: impl Fn() + Send + 'static,
    ) -> Result<bool, CalcError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("recognition round already in flight, ignoring run trigger");
            return Ok(false);
        }

        let base_url = match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => url,
            _ => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(CalcError::Configuration);
            }
        };

        // Serialize on the UI thread so the snapshot reflects the ink as it
        // was when the run was triggered, not whatever is drawn later.
        let body = match build_request(surface, vars) {
            Ok(body) => body,
            Err(err) => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(err);
            }
        };

        let outcome = self.outcome.clone();
        let in_flight = self.in_flight.clone();
        thread::spawn(move || {
            let results = perform_round(&base_url, &body);
            *outcome.lock() = Some(RoundOutcome {
                generation,
                anchor,
                results,
            });
            in_flight.store(false, Ordering::SeqCst);
            repaint();
        });
        Ok(true)
    }

    /// Takes the parked outcome of a completed round, if any. Called from
    /// the UI loop each frame.
    pub fn poll(&self) -> Option<RoundOutcome> {
        self.outcome.lock().take()
    }
}

fn build_request(surface: &Surface, vars: &VariableStore) -> Result<String, CalcError> {
    let png = surface
        .encode_png()
        .map_err(|err| CalcError::Protocol(format!("snapshot encoding failed: {err}")))?;
    let image = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(&png)
    );
    let request = CalcRequest {
        image,
        dict_of_vars: vars.bindings(),
    };
    serde_json::to_string(&request).map_err(|err| CalcError::Protocol(err.to_string()))
}

fn perform_round(base_url: &str, body: &str) -> Result<Vec<RecognitionResult>, CalcError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|err| CalcError::Network(err.to_string()))?;

    let response = client
        .post(format!("{base_url}/calculate"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body.to_owned())
        .send()
        .map_err(|err| CalcError::Network(err.to_string()))?;

    if !response.status().is_success() {
        return Err(CalcError::Network(format!(
            "http status {}",
            response.status()
        )));
    }

    let text = response
        .text()
        .map_err(|err| CalcError::Network(err.to_string()))?;
    normalize(&text)
}
