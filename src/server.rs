//! HTTP front end: takes an input path and an output format, answers with a
//! message the caller can show to a user.

use crate::classifier::{IMAGE_EXTENSIONS, PDF_EXTENSIONS, TEXT_EXTENSIONS};
use crate::converter::FileConverter;
use crate::types::*;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use std::path::Path;
use std::sync::Mutex;

// One converter behind a lock: conversions run strictly one at a time.
pub type ConverterState = web::Data<Mutex<FileConverter>>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/formats", web::get().to(formats))
        .route("/convert", web::post().to(convert_file));
}

/// Only pages served from this machine may call the service from a browser.
pub fn cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            origin.to_str().map(is_local_origin).unwrap_or(false)
        })
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}

/// `http(s)://localhost`, `127.0.0.1` or `[::1]`, with or without a port.
pub fn is_local_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    let authority = rest.split('/').next().unwrap_or("");
    let host = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": {
            "image_formats": ["JPEG", "PNG", "GIF", "BMP"],
            "document_formats": ["TXT", "DOC", "PDF"],
            "operations": ["image_conversion", "text_to_pdf", "pdf_to_text"]
        }
    })))
}

async fn formats() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "input": {
            "image": IMAGE_EXTENSIONS,
            "text": TEXT_EXTENSIONS,
            "pdf": PDF_EXTENSIONS
        },
        "output": {
            "image": ["JPEG", "PNG", "GIF", "BMP"],
            "text": ["PDF"],
            "pdf": ["DOC"]
        }
    })))
}

async fn convert_file(
    req: web::Json<ConvertRequest>,
    converter_state: ConverterState,
) -> Result<HttpResponse> {
    let ConvertRequest {
        input_path,
        output_format,
    } = req.into_inner();
    log::info!("🚀 Conversion request: '{}' -> '{}'", input_path, output_format);

    let request = match ConversionRequest::new(input_path.as_str(), output_format) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected conversion request: {}", e);
            return Ok(HttpResponse::BadRequest()
                .json(ConversionOutcome::failure(Path::new(&input_path), &e)));
        }
    };

    let result = web::block(move || {
        converter_state
            .lock()
            .map(|converter| converter.run(&request))
            .map_err(|e| e.to_string())
    })
    .await;

    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            log::error!("Failed to acquire converter lock: {}", e);
            return Ok(service_unavailable());
        }
        Err(e) => {
            log::error!("Conversion task did not complete: {}", e);
            return Ok(service_unavailable());
        }
    };

    let response = match &outcome {
        ConversionOutcome::Success { .. } => HttpResponse::Ok().json(&outcome),
        ConversionOutcome::Failure {
            kind: ErrorKind::NoInputSelected,
            ..
        } => HttpResponse::BadRequest().json(&outcome),
        ConversionOutcome::Failure { .. } => HttpResponse::UnprocessableEntity().json(&outcome),
    };
    Ok(response)
}

fn service_unavailable() -> HttpResponse {
    HttpResponse::InternalServerError().json(ConversionOutcome::Failure {
        kind: ErrorKind::ConversionFailed,
        message: "Service temporarily unavailable".to_string(),
    })
}
