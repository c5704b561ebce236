use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use enrich::{project, validate_columns, CompanyQuery};

use crate::error::{AppError, AppResult};
use crate::models::{CreateJob, EnrichRequest, EnrichResponse};
use crate::state::AppState;
use crate::utils;

/// Enrich a single query and project the result onto the requested columns
pub async fn enrich(
    State(state): State<AppState>,
    Json(payload): Json<EnrichRequest>,
) -> AppResult<Json<EnrichResponse>> {
    if payload.query.trim().is_empty() {
        return Err(AppError::bad_request("Query must not be empty"));
    }
    // Column validation happens before any provider is contacted
    validate_columns(&payload.rows)?;

    let query = CompanyQuery::new(&payload.query, payload.location);
    let record = state.enricher.enrich(&query).await?;

    if record.is_empty() {
        return Err(AppError::NoData(format!(
            "No company data found for \"{}\"",
            payload.query
        )));
    }

    let data = project(&record, &payload.rows)?;
    Ok(Json(EnrichResponse::ok("Company enriched successfully", data)))
}

/// Enrich every row of an uploaded CSV/XLSX file under a tracked job and
/// respond with the output artifact
pub async fn enrich_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (file_name, bytes) = read_upload(multipart).await?;
    let rows = utils::parse_rows(&file_name, &bytes)?;

    let job = state
        .jobs
        .create(CreateJob {
            owner: "api".to_string(),
            query_source: file_name,
            total_rows: rows.len() as i64,
        })
        .await?;

    let outcome = state.batch.run(job.id, rows).await?;
    tracing::info!(
        "Batch job {} produced {} enriched rows out of {}",
        job.id,
        outcome.enriched,
        outcome.total_rows
    );

    let content = tokio::fs::read(&outcome.path)
        .await
        .map_err(|e| AppError::internal(format!("Failed to read output artifact: {}", e)))?;

    let attachment = format!("attachment; filename=\"enrichment_{}.csv\"", job.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, attachment),
        ],
        content,
    )
        .into_response())
}

/// Pull the first file field out of the multipart body
async fn read_upload(mut multipart: Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {}", e)))?;
        return Ok((file_name, bytes));
    }

    Err(AppError::bad_request("Missing file upload"))
}
