//! Index endpoint: chunk, embed, and append a PDF to the vector index

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::{parse_pdf, TextChunker};
use crate::server::state::AppState;
use crate::types::{IndexResponse, Passage};

/// POST /api/index - Ingest a PDF into the vector index
pub async fn build_index(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IndexResponse>> {
    let start = Instant::now();

    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() == Some("file") {
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
    }

    let (filename, data) = file.ok_or_else(|| Error::invalid_input("Missing 'file' field"))?;
    if data.is_empty() {
        return Err(Error::invalid_input("Uploaded file is empty"));
    }

    tracing::info!("Indexing {} ({} bytes)", filename, data.len());

    let pages = {
        let filename = filename.clone();
        tokio::task::spawn_blocking(move || parse_pdf(&filename, &data))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??
    };

    let chunks = TextChunker::default().chunk_pages(&pages);
    if chunks.is_empty() {
        return Err(Error::file_parse(
            &filename,
            "Document produced no indexable text",
        ));
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = state.embedding_provider().embed_batch(&texts).await?;

    let passages: Vec<Passage> = chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| {
            Passage::new(
                chunk.content,
                embedding,
                filename.clone(),
                Some(chunk.page_number),
                chunk.chunk_index,
            )
        })
        .collect();

    let passages_added = passages.len();
    state.index().add(passages)?;

    tracing::info!(
        "Indexed {}: {} passages added ({} total)",
        filename,
        passages_added,
        state.index().len()
    );

    Ok(Json(IndexResponse {
        filename,
        passages_added,
        index_size: state.index().len(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
