use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use lifegrid::Simulation;
use lifegrid::config::Params;
use lifegrid::error::LifeError;
use lifegrid::render;
use lifegrid::grid::Grid;
use lifegrid::sink::FrameSink;

const MAX_STEPS: u64 = 500;
/// One rendered frame: 2048x2048 pixels, 16 MiB of RGBA.
const MAX_FRAME_PIXELS: usize = 1 << 22;
/// Rendered pixels summed over every frame of one request.
const MAX_TOTAL_PIXELS: u64 = 1 << 30;

/// `Params` overrides plus the PNG scale.
#[derive(Deserialize)]
struct SimulateRequest {
    #[serde(flatten)]
    params: Params,
    scale: Option<usize>,
}

#[derive(Serialize)]
struct SimulateResponse {
    frames: Vec<Frame>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
}

#[derive(Serialize)]
struct Frame {
    step: u64,
    alive: usize,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<LifeError> for ApiError {
    fn from(e: LifeError) -> Self {
        match e {
            LifeError::Io(_) | LifeError::Image(_) | LifeError::ThreadPool(_) => Self::Internal(e.to_string()),
            _ => Self::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

fn encode_png(rgba: &[u8], w: u32, h: u32) -> Result<String, LifeError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w, h, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Renders and encodes each frame as it arrives, so no grid outlives its step.
struct DataUrlSink {
    scale: usize,
    frames: Vec<Frame>,
}

impl FrameSink for DataUrlSink {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<(), LifeError> {
        let (pw, ph) = render::image_size(grid, self.scale);
        let data_url = encode_png(&render::render_cells(grid, self.scale), pw, ph)?;
        self.frames.push(Frame {
            step,
            alive: grid.alive(),
            data_url,
        });
        Ok(())
    }
}

fn check_budget(params: &Params, scale: usize) -> Result<(), ApiError> {
    let frame_pixels = params
        .width
        .checked_mul(params.height)
        .and_then(|cells| cells.checked_mul(scale.checked_mul(scale)?))
        .filter(|&px| px <= MAX_FRAME_PIXELS)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "{}x{} at scale {scale} exceeds {MAX_FRAME_PIXELS} pixels per frame",
                params.width, params.height
            ))
        })?;

    if (frame_pixels as u64).saturating_mul(params.steps) > MAX_TOTAL_PIXELS {
        return Err(ApiError::BadRequest(format!(
            "{} frames of {frame_pixels} pixels exceed {MAX_TOTAL_PIXELS} pixels in total",
            params.steps
        )));
    }
    Ok(())
}

fn simulate(params: Params, scale: usize) -> Result<SimulateResponse, ApiError> {
    check_budget(&params, scale)?;

    let mut sim = Simulation::new(&params)?;
    let mut encoder = DataUrlSink {
        scale,
        frames: Vec::new(),
    };
    let mut sinks: [&mut dyn FrameSink; 1] = [&mut encoder];
    let summary = sim.run(&mut sinks)?;

    let timings = summary
        .timings
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect();

    Ok(SimulateResponse {
        frames: encoder.frames,
        timings,
        width: params.width,
        height: params.height,
    })
}

async fn simulate_handler(Json(req): Json<SimulateRequest>) -> Result<Json<SimulateResponse>, ApiError> {
    let mut params = req.params;
    params.steps = params.steps.min(MAX_STEPS);
    params.frame_delay_ms = 0;
    let scale = req.scale.unwrap_or(4).clamp(1, 16);

    let response = tokio::task::spawn_blocking(move || simulate(params, scale))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(response))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("lifegrid server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
