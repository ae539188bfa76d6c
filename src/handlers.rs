use crate::entries::{create_entry, delete_entry, list_entries};
use crate::errors::{AppError, JournalError};
use crate::models::{
    Entry, EntriesQuery, EntryId, ImportPreview, JournalData, NewEntry, NewVocabularyItem,
    Preferences, PreferencesUpdate, SelectionRequest, SelectionResponse, StatsQuery,
    StatsResponse, VocabularyItem, VocabularyKind,
};
use crate::preferences::update_preferences;
use crate::snapshot::{apply_snapshot, export_json, parse_snapshot, EXPORT_FILE_NAME};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::{render_index, MANIFEST_JSON, SERVICE_WORKER_JS};
use crate::vocabulary::{add_item, list_items, remove_item};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use tokio::sync::MutexGuard;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let session = state.session.lock().await;
    Html(render_index(&data, &session.selection, state.history_limit))
}

pub async fn ping() -> &'static str {
    "Server is alive"
}

pub async fn service_worker() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        SERVICE_WORKER_JS,
    )
}

pub async fn web_manifest() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/manifest+json")], MANIFEST_JSON)
}

pub async fn get_entries(
    State(state): State<AppState>,
    Query(query): Query<EntriesQuery>,
) -> Json<Vec<Entry>> {
    let data = state.data.lock().await;
    Json(list_entries(&data, query.limit))
}

pub async fn post_entry(
    State(state): State<AppState>,
    Json(mut payload): Json<NewEntry>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let mut data = state.data.lock().await;
    let mut session = state.session.lock().await;

    let explicit = payload
        .emotion
        .as_deref()
        .is_some_and(|emotion| !emotion.trim().is_empty());
    if !explicit {
        payload.emotion = session.selection.current().map(str::to_string);
    }

    let mut next = data.clone();
    let entry = create_entry(&mut next, payload, Utc::now())?;
    commit(&state, &mut data, next).await?;
    if !explicit {
        session.selection.consume();
    }

    info!(id = entry.id, emotion = %entry.emotion, "entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    delete_entry(&mut next, id)?;
    commit(&state, &mut data, next).await?;

    info!(id, "entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_emotions(State(state): State<AppState>) -> Json<Vec<VocabularyItem>> {
    list_vocabulary(&state, VocabularyKind::Emotions).await
}

pub async fn post_emotion(
    State(state): State<AppState>,
    Json(payload): Json<NewVocabularyItem>,
) -> Result<(StatusCode, Json<VocabularyItem>), AppError> {
    add_vocabulary(&state, VocabularyKind::Emotions, payload).await
}

pub async fn delete_emotion(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_vocabulary(&state, VocabularyKind::Emotions, &name).await
}

pub async fn get_tags(State(state): State<AppState>) -> Json<Vec<VocabularyItem>> {
    list_vocabulary(&state, VocabularyKind::Tags).await
}

pub async fn post_tag(
    State(state): State<AppState>,
    Json(payload): Json<NewVocabularyItem>,
) -> Result<(StatusCode, Json<VocabularyItem>), AppError> {
    add_vocabulary(&state, VocabularyKind::Tags, payload).await
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_vocabulary(&state, VocabularyKind::Tags, &name).await
}

pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let session = state.session.lock().await;
    Json(SelectionResponse {
        selected: session.selection.current().map(str::to_string),
    })
}

pub async fn post_selection(
    State(state): State<AppState>,
    Json(payload): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let data = state.data.lock().await;
    let mut session = state.session.lock().await;
    let selected = session.selection.pick(&payload.emotion, &data.emotions)?;
    Ok(Json(SelectionResponse {
        selected: Some(selected.to_string()),
    }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let order: Option<Vec<String>> = query.order.map(|order| {
        order
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    });
    let data = state.data.lock().await;
    Json(build_stats(&data, order.as_deref()))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let data = state.data.lock().await;
    Json(data.preferences.clone())
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Json(payload): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.preferences = update_preferences(&data.preferences, payload)?;
    let preferences = next.preferences.clone();
    commit(&state, &mut data, next).await?;

    info!(theme = %preferences.theme, language = %preferences.language, dark_mode = preferences.dark_mode, "preferences saved");
    Ok(Json(preferences))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let body = export_json(&data)?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Parses an uploaded document and stages it until confirmed or discarded.
pub async fn stage_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportPreview>, AppError> {
    let snapshot = parse_snapshot(&body)?;
    let preview = snapshot.preview();
    let mut session = state.session.lock().await;
    session.pending_import = Some(snapshot);
    Ok(Json(preview))
}

pub async fn confirm_import(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mut session = state.session.lock().await;
    let snapshot = session
        .pending_import
        .clone()
        .ok_or(JournalError::NoPendingImport)?;

    let mut next = data.clone();
    apply_snapshot(&mut next, snapshot);
    commit(&state, &mut data, next).await?;
    session.pending_import = None;
    session.selection.retain_available(&data.emotions);

    info!(
        entries = data.entries.len(),
        emotions = data.emotions.len(),
        tags = data.tags.len(),
        "import committed"
    );
    Ok(Json(build_stats(&data, None)))
}

pub async fn discard_import(State(state): State<AppState>) -> StatusCode {
    let mut session = state.session.lock().await;
    if session.pending_import.take().is_some() {
        info!("import discarded");
    }
    StatusCode::NO_CONTENT
}

async fn list_vocabulary(state: &AppState, kind: VocabularyKind) -> Json<Vec<VocabularyItem>> {
    let data = state.data.lock().await;
    Json(list_items(&data, kind).to_vec())
}

async fn add_vocabulary(
    state: &AppState,
    kind: VocabularyKind,
    payload: NewVocabularyItem,
) -> Result<(StatusCode, Json<VocabularyItem>), AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let item = add_item(&mut next, kind, &payload.name, payload.color.as_deref())?;
    commit(state, &mut data, next).await?;

    info!(name = %item.name, "{kind} added");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_vocabulary(
    state: &AppState,
    kind: VocabularyKind,
    name: &str,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let Some(removed) = remove_item(&mut next, kind, name) else {
        return Ok(StatusCode::NO_CONTENT);
    };
    commit(state, &mut data, next).await?;

    if kind == VocabularyKind::Emotions {
        let mut session = state.session.lock().await;
        session.selection.retain_available(&data.emotions);
    }
    info!(name = %removed.name, "{kind} removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Persists `next` and only then makes it the live document.
async fn commit(
    state: &AppState,
    data: &mut MutexGuard<'_, JournalData>,
    next: JournalData,
) -> Result<(), AppError> {
    persist_data(&state.data_path, &next).await?;
    **data = next;
    Ok(())
}
