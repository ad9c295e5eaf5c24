//! Single binary web server: wizard sessions and tournament records over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), DATA_FILE (JSON store path;
//! records are kept in memory when unset).

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tournament_wizard::storage::load;
use tournament_wizard::wizard::{SubmissionError, WizardSnapshot};
use tournament_wizard::{
    complete_tournament, import_participants, start_tournament, to_form_data, Advance, Category,
    FieldTypeRegistry, FieldValue, JsonFileStore, MemoryStore, ParticipantId, RawInput, Sequencer,
    SharedStore, StorageError, Tournament, TournamentId, TournamentStore, UpdateError, Validation,
    WizardError, WizardSession,
};
use uuid::Uuid;

type SessionId = Uuid;

/// Per-session entry: wizard state, the tournament being edited (if any), last activity time.
struct SessionEntry {
    session: WizardSession,
    tournament_id: Option<TournamentId>,
    last_activity: Instant,
}

struct AppContext {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    store: SharedStore,
    sequencer: Arc<Sequencer>,
    registry: Arc<FieldTypeRegistry>,
}

type AppState = Data<AppContext>;

/// Inactivity threshold: wizard sessions not touched for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    tournament_id: Option<TournamentId>,
    #[serde(flatten)]
    snapshot: WizardSnapshot,
}

#[derive(Serialize)]
struct AdvanceResponse {
    blocked: bool,
    failures: HashMap<String, Validation>,
    #[serde(flatten)]
    session: SessionResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionBody {
    /// Edit an existing tournament instead of creating a new one.
    tournament_id: Option<TournamentId>,
}

/// Either raw editor input (decoded by the registry) or an already-typed value.
#[derive(Deserialize)]
struct SetFieldBody {
    #[serde(default)]
    input: Option<RawInput>,
    #[serde(default)]
    value: Option<FieldValue>,
}

#[derive(Deserialize)]
struct JumpBody {
    category: Category,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct FieldPath {
    id: SessionId,
    key: String,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

fn error_json(e: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

fn storage_error(e: StorageError) -> HttpResponse {
    log::error!("{}", e);
    match e {
        StorageError::Unavailable(_) => HttpResponse::ServiceUnavailable().json(error_json(e)),
        StorageError::WriteFailed(_) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

fn wizard_error(e: WizardError) -> HttpResponse {
    match e {
        WizardError::UnknownField(_) => HttpResponse::NotFound().json(error_json(e)),
        _ => HttpResponse::Conflict().json(error_json(e)),
    }
}

fn session_response(id: SessionId, entry: &SessionEntry) -> SessionResponse {
    SessionResponse {
        id,
        tournament_id: entry.tournament_id,
        snapshot: entry.session.snapshot(),
    }
}

/// Run `f` on the session and answer with its snapshot.
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut WizardSession) -> Result<(), WizardError>,
{
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_json("No wizard session")),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.session) {
        Ok(()) => HttpResponse::Ok().json(session_response(id, entry)),
        Err(e) => wizard_error(e),
    }
}

/// Apply `f` to a stored tournament under the store's write lock; answer with the saved record.
fn update_tournament<F, E>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), E>,
    E: std::fmt::Display,
{
    match state.store.update(id, f) {
        Ok(Some(tournament)) => HttpResponse::Ok().json(tournament.to_record()),
        Ok(None) => HttpResponse::NotFound().json(error_json("No tournament")),
        Err(UpdateError::Rejected(e)) => HttpResponse::BadRequest().json(error_json(e)),
        Err(UpdateError::Storage(e)) => storage_error(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-wizard",
    })
}

/// Field catalogue, per category, for the presentation layer.
#[get("/api/wizard/fields")]
async fn api_wizard_fields(state: AppState) -> HttpResponse {
    let categories: Vec<_> = state
        .sequencer
        .categories()
        .into_iter()
        .map(|c| serde_json::json!({ "category": c, "fields": state.sequencer.fields(c) }))
        .collect();
    HttpResponse::Ok().json(categories)
}

/// Open a wizard session, optionally pre-filled from an existing tournament.
#[post("/api/wizard")]
async fn api_create_session(state: AppState, body: Option<Json<CreateSessionBody>>) -> HttpResponse {
    let tournament_id = body.and_then(|b| b.tournament_id);
    let values = match tournament_id {
        Some(tid) => match load(state.store.store(), tid) {
            Ok(Some(t)) => to_form_data(&t.config),
            Ok(None) => return HttpResponse::NotFound().json(error_json("No tournament")),
            Err(e) => return storage_error(e),
        },
        None => Default::default(),
    };
    let session = match WizardSession::edit(
        Arc::clone(&state.sequencer),
        Arc::clone(&state.registry),
        values,
    ) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}", e);
            return HttpResponse::InternalServerError().json(error_json(e));
        }
    };
    let id = Uuid::new_v4();
    let entry = SessionEntry {
        session,
        tournament_id,
        last_activity: Instant::now(),
    };
    let response = session_response(id, &entry);
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(id, entry);
    HttpResponse::Ok().json(response)
}

#[get("/api/wizard/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |_| Ok(()))
}

/// Set one field, from raw input or a typed value. A missing value clears the field.
#[put("/api/wizard/{id}/fields/{key}")]
async fn api_set_field(state: AppState, path: Path<FieldPath>, body: Json<SetFieldBody>) -> HttpResponse {
    let body = body.into_inner();
    with_session(&state, path.id, |session| match body.input {
        Some(input) => session.set_field_input(&path.key, input).map(|_| ()),
        None => session.set_field_value(&path.key, body.value).map(|_| ()),
    })
}

/// Advance to the next step. A blocked advance is still 200, with the failing fields.
#[post("/api/wizard/{id}/advance")]
async fn api_advance(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_json("No wizard session")),
    };
    entry.last_activity = Instant::now();
    match entry.session.advance() {
        Ok(advance) => {
            let (blocked, failures) = match advance {
                Advance::Moved(_) => (false, HashMap::new()),
                Advance::Blocked { failures, .. } => (true, failures.into_iter().collect()),
            };
            HttpResponse::Ok().json(AdvanceResponse {
                blocked,
                failures,
                session: session_response(path.id, entry),
            })
        }
        Err(e) => wizard_error(e),
    }
}

#[post("/api/wizard/{id}/retreat")]
async fn api_retreat(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |session| session.retreat().map(|_| ()))
}

#[post("/api/wizard/{id}/jump")]
async fn api_jump(state: AppState, path: Path<SessionPath>, body: Json<JumpBody>) -> HttpResponse {
    with_session(&state, path.id, |session| session.jump_to(body.category).map(|_| ()))
}

/// Build the config from a submitted session and save it (new tournament or the edited one).
#[post("/api/wizard/{id}/save")]
async fn api_save_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    // Take the session out of the map so store I/O runs without the sessions lock.
    let (entry, config) = {
        let mut g = match state.sessions.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let config = match g.get(&path.id).map(|e| e.session.config()) {
            Some(Ok(c)) => c,
            Some(Err(SubmissionError::Wizard(e))) => return wizard_error(e),
            Some(Err(e)) => return HttpResponse::BadRequest().json(error_json(e)),
            None => return HttpResponse::NotFound().json(error_json("No wizard session")),
        };
        match g.remove(&path.id) {
            Some(entry) => (entry, config),
            None => return HttpResponse::NotFound().json(error_json("No wizard session")),
        }
    };

    let saved = match entry.tournament_id {
        Some(tid) => state.store.update(tid, |t| t.reconfigure(config)),
        None => {
            let mut tournament = Tournament::new(config);
            state
                .store
                .save(&mut tournament)
                .map(|_| Some(tournament))
                .map_err(UpdateError::Storage)
        }
    };
    let response = match saved {
        Ok(Some(tournament)) => return HttpResponse::Ok().json(tournament.to_record()),
        Ok(None) => HttpResponse::NotFound().json(error_json("No tournament")),
        Err(UpdateError::Rejected(e)) => HttpResponse::BadRequest().json(error_json(e)),
        Err(UpdateError::Storage(e)) => storage_error(e),
    };
    // Not saved: put the session back so the organizer can retry.
    if let Ok(mut g) = state.sessions.write() {
        g.insert(path.id, entry);
    }
    response
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.store.store().get_tournaments() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => storage_error(e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.store().get_tournament(path.id) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(error_json("No tournament")),
        Err(e) => storage_error(e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.delete(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => storage_error(e),
    }
}

/// Add a participant (tournament must not have started).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.add_participant(body.name.as_str()).map(|_| ()))
}

/// Import participants from a CSV body with a `name` column.
#[post("/api/tournaments/{id}/participants/import")]
async fn api_import_participants(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        import_participants(t, body.as_bytes()).map(|_| ())
    })
}

#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<TournamentParticipantPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.remove_participant(path.participant_id))
}

/// Start the tournament (NotStarted -> InProgress, needs 2+ participants).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, start_tournament)
}

/// Complete the tournament (InProgress -> Completed).
#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, complete_tournament)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn open_store() -> Box<dyn TournamentStore> {
    match std::env::var("DATA_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            log::info!("Storing tournaments in {}", path);
            Box::new(JsonFileStore::new(path))
        }
        _ => {
            log::info!("DATA_FILE not set; tournaments are kept in memory");
            Box::new(MemoryStore::new())
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppContext {
        sessions: RwLock::new(HashMap::new()),
        store: SharedStore::new(open_store()),
        sequencer: Arc::new(Sequencer::tournament()),
        registry: Arc::new(FieldTypeRegistry::standard()),
    });

    // Background task: every 30 minutes, drop wizard sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.sessions.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive wizard session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_wizard_fields)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_set_field)
            .service(api_advance)
            .service(api_retreat)
            .service(api_jump)
            .service(api_save_session)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_participant)
            .service(api_import_participants)
            .service(api_remove_participant)
            .service(api_start_tournament)
            .service(api_complete_tournament)
            .default_service(web::route().to(not_found))
    })
    .bind(bind)?
    .run()
    .await
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(error_json("Not found"))
}
