//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::notes::{
    generate_note, NoteDraft, NoteLength, NoteMode, NoteRequest, NOTE_CATEGORIES, ONE_SHOT_STYLES,
};
use crate::generation::scholar::{generate_scholar, ScholarDraft, ScholarRequest};
use crate::render::{note_export, scholar_export, ExportBundle};
use crate::state::AppState;
use crate::synth::citation::style_names;
use crate::synth::tables::{POOL_NOTE_BODIES, POOL_NOTE_TITLES};
use crate::synth::DEFAULT_CATEGORY;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub generation_id: Uuid,
    #[serde(flatten)]
    pub draft: NoteDraft,
    pub export: ExportBundle,
}

#[derive(Debug, Serialize)]
pub struct ScholarResponse {
    pub generation_id: Uuid,
    #[serde(flatten)]
    pub draft: ScholarDraft,
    pub export: ExportBundle,
}

#[derive(Debug, Deserialize)]
pub struct FormatCitationsRequest {
    pub field: String,
    pub citation_style: String,
}

#[derive(Debug, Serialize)]
pub struct FormatCitationsResponse {
    pub field: String,
    pub citation_style: String,
    pub citations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub scenes: Vec<String>,
    pub styles: Vec<String>,
    pub lengths: Vec<NoteLength>,
    pub categories: Vec<&'static str>,
    pub modes: Vec<NoteMode>,
    /// Style suggestions for `one_shot` notes.
    pub one_shot_styles: Vec<&'static str>,
    pub citation_styles: Vec<&'static str>,
    pub fields: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/notes/generate
///
/// Titles, body and hashtags for a social note. Sections the model cannot
/// produce come from the synthesizer.
pub async fn handle_generate_note(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    request.validate()?;
    let llm = state.language_model(request.api_key.as_deref())?;
    let mut rng = state.rng(request.seed);

    let draft = generate_note(llm.as_deref(), &state.synth, &request, &mut rng).await?;
    let export = note_export(request.topic.trim(), &draft, Utc::now());
    let generation_id = Uuid::new_v4();
    info!("Note {generation_id} generated for topic '{}'", request.topic.trim());

    Ok(Json(NoteResponse {
        generation_id,
        draft,
        export,
    }))
}

/// POST /api/v1/scholar/generate
pub async fn handle_generate_scholar(
    State(state): State<AppState>,
    Json(request): Json<ScholarRequest>,
) -> Result<Json<ScholarResponse>, AppError> {
    request.validate()?;
    let llm = state.language_model(request.api_key.as_deref())?;
    let mut rng = state.rng(request.seed);

    let draft = generate_scholar(llm.as_deref(), &state.synth, &request, &mut rng).await?;
    let export = scholar_export(request.field.trim(), &draft, Utc::now());
    let generation_id = Uuid::new_v4();
    info!("Scholar draft {generation_id} generated for field '{}'", request.field.trim());

    Ok(Json(ScholarResponse {
        generation_id,
        draft,
        export,
    }))
}

/// POST /api/v1/citations/format
///
/// Formats the literature table of a field; unknown fields use the default list.
pub async fn handle_format_citations(
    State(state): State<AppState>,
    Json(request): Json<FormatCitationsRequest>,
) -> Result<Json<FormatCitationsResponse>, AppError> {
    let field = request.field.trim();
    if field.is_empty() {
        return Err(AppError::Validation("field cannot be empty".to_string()));
    }
    let citations = state.synth.citations(field, &request.citation_style)?;

    Ok(Json(FormatCitationsResponse {
        field: field.to_string(),
        citation_style: request.citation_style,
        citations,
    }))
}

/// GET /api/v1/catalog
pub async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let fields = state
        .synth
        .tables()
        .literature
        .keys()
        .filter(|k| k.as_str() != DEFAULT_CATEGORY)
        .cloned()
        .collect();

    Json(CatalogResponse {
        scenes: state.synth.categories(POOL_NOTE_TITLES),
        styles: state.synth.categories(POOL_NOTE_BODIES),
        lengths: NoteLength::ALL.to_vec(),
        categories: NOTE_CATEGORIES.to_vec(),
        modes: NoteMode::ALL.to_vec(),
        one_shot_styles: ONE_SHOT_STYLES.to_vec(),
        citation_styles: style_names().collect(),
        fields,
    })
}

/// POST /api/v1/llm/verify
///
/// A rejected key is reported as `valid: false`, not as an error status.
pub async fn handle_verify_llm(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let llm = state
        .language_model(request.api_key.as_deref())?
        .ok_or_else(|| {
            AppError::Validation("no API key supplied and none configured".to_string())
        })?;

    let response = match llm.verify().await {
        Ok(()) => VerifyResponse {
            valid: true,
            model: llm.model().to_string(),
            message: None,
        },
        Err(e) => {
            warn!("API key verification failed: {e}");
            VerifyResponse {
                valid: false,
                model: llm.model().to_string(),
                message: Some(e.to_string()),
            }
        }
    };
    Ok(Json(response))
}
