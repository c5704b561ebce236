use axum::{
    extract::{Path, Query, State},
    response::sse::{Event as SseEvent, KeepAlive},
    response::Sse,
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::{convert::Infallible, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::error::AppResult;
use crate::models::{Job, JobEvent};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct JobListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FailJobRequest {
    pub reason: Option<String>,
}

/// List recent jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> AppResult<Json<Vec<Job>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let jobs = state.jobs.list(limit).await?;
    Ok(Json(jobs))
}

/// Get a job by ID
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Job>> {
    let job = state.jobs.get(id).await?;
    Ok(Json(job))
}

/// Mark a job failed out-of-band. Stops further batch rows best-effort.
pub async fn fail_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Option<Json<FailJobRequest>>,
) -> AppResult<Json<Job>> {
    let reason = payload
        .and_then(|Json(body)| body.reason)
        .unwrap_or_else(|| "Marked failed by operator".to_string());
    let job = state.jobs.fail(id, &reason).await?;
    Ok(Json(job))
}

/// Stream job transitions via Server-Sent Events (SSE), keyed by job id.
/// The stream ends after a terminal event.
pub async fn job_events(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    // Push the current snapshot first so late subscribers see the state
    let job = state.jobs.get(id).await?;
    let snapshot = JobEvent::from_job(&job);
    let mut done = job.status.is_terminal();

    let rx = state.jobs.subscribe();
    let live_stream = BroadcastStream::new(rx)
        .filter_map(move |result| match result {
            Ok(event) if event.id == id => Some(event),
            // Skip lagged messages and other jobs' events
            _ => None,
        })
        .take_while(move |event| {
            if done {
                return false;
            }
            done = event.status.is_terminal();
            true
        })
        .map(to_sse_event);

    let initial_stream = tokio_stream::once(to_sse_event(snapshot));
    let combined_stream = initial_stream.chain(live_stream);

    Ok(Sse::new(combined_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

fn to_sse_event(event: JobEvent) -> Result<SseEvent, Infallible> {
    let data = serde_json::to_string(&event).unwrap_or_default();
    Ok(SseEvent::default().data(data))
}
