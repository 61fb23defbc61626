//! JSON API over the bracket engine. Holds tournaments in memory by id.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, INACTIVITY_HOURS (sweep threshold, default 12).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use double_elim_bracket::{
    correct_result, generate_bracket, get_rankings, record_result, schedule, top_rankings,
    write_rankings_csv, Tournament, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Server settings read from the environment at startup.
#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    inactivity_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let hours: u64 = std::env::var("INACTIVITY_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(12);
        Self {
            host,
            port,
            inactivity_timeout: hours_to_duration(hours),
        }
    }
}

/// Saturates instead of overflowing on absurd `INACTIVITY_HOURS` values.
fn hours_to_duration(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    participants: Vec<String>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct WinnerBody {
    winner: String,
}

#[derive(Deserialize)]
struct RankingsQuery {
    top: Option<usize>,
}

#[derive(Serialize)]
struct RankingsResponse {
    complete: bool,
    rankings: Vec<double_elim_bracket::RankingEntry>,
    /// Teams the routing lost track of; non-empty means a bracket defect.
    stranded: Vec<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/W1-1)
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: String,
}

/// Trim names, drop blanks and repeated names (exact, case-sensitive match).
fn clean_participants(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut names = Vec::new();
    for name in raw {
        let name = name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            names.push(name);
        } else {
            duplicates.push(name);
        }
    }
    if !duplicates.is_empty() {
        log::warn!("Duplicate team names removed: {}", duplicates.join(", "));
    }
    names
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::UnknownMatch(_) => HttpResponse::NotFound().json(body),
        e if e.is_structural() => {
            log::error!("Bracket structure error: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "double-elim-bracket",
    })
}

/// Generate a new bracket (returns the tournament with its id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let participants = clean_participants(body.participants);
    let tournament = match generate_bracket(&participants, body.seed) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let id = tournament.id();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => no_tournament(),
    }
}

#[get("/api/tournaments/{id}/matches/{match_id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    match entry.tournament.find_match(&path.match_id) {
        Some(m) => HttpResponse::Ok().json(m),
        None => error_response(&TournamentError::UnknownMatch(path.match_id.clone())),
    }
}

/// Record the winner of an undecided match.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(state: AppState, path: Path<MatchPath>, body: Json<WinnerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match record_result(t, &path.match_id, body.winner.trim()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Change the winner of an already decided match.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_correct_result(state: AppState, path: Path<MatchPath>, body: Json<WinnerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match correct_result(t, &path.match_id, body.winner.trim()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Standings in display order; `?top=N` limits the list.
#[get("/api/tournaments/{id}/rankings")]
async fn api_rankings(state: AppState, path: Path<TournamentPath>, query: Query<RankingsQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get(&path.id) {
        Some(e) => &e.tournament,
        None => return no_tournament(),
    };
    let rankings = match query.top {
        Some(n) => top_rankings(t, n),
        None => get_rankings(t),
    };
    HttpResponse::Ok().json(RankingsResponse {
        complete: t.is_complete(),
        rankings,
        stranded: t.stranded_teams(),
    })
}

#[get("/api/tournaments/{id}/rankings.csv")]
async fn api_rankings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get(&path.id) {
        Some(e) => &e.tournament,
        None => return no_tournament(),
    };
    let mut buf = Vec::new();
    if let Err(e) = write_rankings_csv(&get_rankings(t), &mut buf) {
        log::error!("CSV export failed: {}", e);
        return HttpResponse::InternalServerError().body("csv error");
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(buf)
}

/// Matches grouped into time slots that can run in parallel.
#[get("/api/tournaments/{id}/schedule")]
async fn api_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(schedule(&entry.tournament)),
        None => no_tournament(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments past the inactivity timeout
    let state_cleanup = state.clone();
    let timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_get_match)
            .service(api_record_result)
            .service(api_correct_result)
            .service(api_rankings_csv)
            .service(api_rankings)
            .service(api_schedule)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactivity_hours_convert_without_overflow() {
        assert_eq!(hours_to_duration(12), Duration::from_secs(12 * 3600));
        assert_eq!(hours_to_duration(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn clean_participants_trims_and_dedupes() {
        let raw = vec![" A ".to_string(), "".to_string(), "B".to_string(), "A".to_string()];
        assert_eq!(clean_participants(raw), vec!["A".to_string(), "B".to_string()]);
    }
}
