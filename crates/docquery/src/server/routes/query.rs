//! Query endpoint: PDF upload + question, answer + literal matches

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::parse_pdf;
use crate::scan::scan_pages;
use crate::server::state::AppState;
use crate::types::{PageText, QueryResponse};

/// Cap on synchronous PDF extraction; complex fonts can hang the extractor
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// POST /api/query - Run the full document query pipeline
pub async fn handle_query(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<QueryResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut query: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "document.pdf".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::invalid_input(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            "query" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::invalid_input(format!("Failed to read query: {}", e)))?;
                query = Some(text);
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field '{}'", other);
            }
        }
    }

    let (filename, data) = file.ok_or_else(|| Error::invalid_input("Missing 'file' field"))?;
    let query = query.ok_or_else(|| Error::invalid_input("Missing 'query' field"))?;

    let response = run_pipeline(&state, &filename, data, &query).await?;
    Ok(Json(response))
}

/// The request pipeline: validate, persist, parse, retrieve, answer, scan.
///
/// The same query string drives both the semantic retrieval and the literal
/// scan. Any step's failure aborts the request; there are no partial results.
pub(crate) async fn run_pipeline(
    state: &AppState,
    filename: &str,
    data: Vec<u8>,
    query: &str,
) -> Result<QueryResponse> {
    let start = Instant::now();

    // Validation happens before any parsing or retrieval work
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::invalid_input("Query must not be empty"));
    }
    if data.is_empty() {
        return Err(Error::invalid_input("Uploaded file is empty"));
    }

    tracing::info!("Query: \"{}\" against {} ({} bytes)", query, filename, data.len());

    // Persist the upload before processing
    let record = state.uploads().store(filename, query, &data)?;

    // Parse the PDF off the async runtime, under a deadline
    let pages = {
        let filename = filename.to_string();
        let task = tokio::task::spawn_blocking(move || parse_pdf(&filename, &data));
        timeout(PDF_EXTRACT_TIMEOUT, task)
            .await
            .map_err(|_| Error::Timeout("pdf extraction".to_string()))?
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??
    };
    tracing::debug!("Extracted {} pages from {}", pages.len(), filename);

    // Semantic retrieval against the prebuilt index
    let query_embedding = state.embedding_provider().embed(query).await?;
    let mut results = state
        .index()
        .search(&query_embedding, state.config().index.top_k)?;
    results.retain(|r| r.similarity >= state.config().index.similarity_threshold);

    // Synthesize an answer from the retrieved passages
    let context = PromptBuilder::build_context(&results);
    let answer = state.llm_provider().generate_answer(query, &context).await?;

    // Literal scan, independent of semantic retrieval
    let matches = scan_literal(&pages, query, state);

    tracing::info!(
        "Query done: {} passages retrieved, {} files with literal matches ({:?})",
        results.len(),
        matches.len(),
        matches.iter().map(|m| m.filename.as_str()).collect::<Vec<_>>()
    );

    Ok(QueryResponse::new(
        answer,
        matches,
        record.id,
        results.len(),
        start.elapsed().as_millis() as u64,
    ))
}

fn scan_literal(
    pages: &[PageText],
    query: &str,
    state: &AppState,
) -> Vec<crate::types::FileMatches> {
    let matches = scan_pages(pages, query, state.config().scan.match_policy);
    let page_total: usize = matches.iter().map(|m| m.pages.len()).sum();
    tracing::debug!("Literal scan: {} page hits for \"{}\"", page_total, query);
    matches
}
