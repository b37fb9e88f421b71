use std::sync::{Arc, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::build::{BuildSummary, ShipBuild, Topic, STARTING_PILOT_SKILL};
use crate::data::{Pilot, Ship, Upgrade};
use crate::error::Error;
use crate::ledger::{LabelledEntry, StoredEntry, XpLedger};
use crate::server::AppState;

/// JSON error body: `{"status": "error", "message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn build_not_found(id: Uuid) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("build {id} not found"))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::UnknownShip { .. }
            | Error::UnknownUpgrade { .. }
            | Error::UnknownPilot { .. }
            | Error::MissingStartingShip => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, message = %self.message, "request failed");
        }
        let body = serde_json::json!({
            "status": "error",
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn lock_builds(
    state: &AppState,
) -> Result<MutexGuard<'_, std::collections::HashMap<Uuid, ShipBuild>>, ApiError> {
    state
        .builds
        .lock()
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "build store lock poisoned"))
}

pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "route not found")
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let builds = state.builds.lock().map(|builds| builds.len()).unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "service": "hotac-api",
        "version": env!("CARGO_PKG_VERSION"),
        "data_version": state.catalog.data_version(),
        "started_at": state.started_at.to_rfc3339(),
        "builds": builds,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub slot: Option<String>,
}

pub async fn list_upgrades(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Json<Vec<Arc<Upgrade>>> {
    let upgrades = match query.slot.as_deref() {
        Some(slot) => state.catalog.upgrades_for_slot(slot).to_vec(),
        None => state.catalog.upgrades().to_vec(),
    };
    Json(upgrades)
}

pub async fn list_pilots(State(state): State<AppState>) -> Json<Vec<Arc<Pilot>>> {
    Json(state.catalog.sort_pilots(state.catalog.pilots().to_vec()))
}

pub async fn list_ships(State(state): State<AppState>) -> Json<Vec<Arc<Ship>>> {
    Json(state.catalog.ships().to_vec())
}

/// Either a fresh build for `ship_id` or a replay of a stored `history`.
#[derive(Debug, Deserialize)]
pub struct CreateBuildRequest {
    pub ship_id: Option<String>,
    pub pilot_skill: Option<u8>,
    pub history: Option<Vec<StoredEntry>>,
}

#[derive(Debug, Serialize)]
pub struct CreateBuildResponse {
    pub id: Uuid,
    pub build: BuildSummary,
}

pub async fn create_build(
    State(state): State<AppState>,
    Json(request): Json<CreateBuildRequest>,
) -> Result<(StatusCode, Json<CreateBuildResponse>), ApiError> {
    let catalog = Arc::clone(&state.catalog);
    let mut build = match (request.history, request.ship_id) {
        (Some(history), _) => {
            let ledger = XpLedger::from_stored(&history);
            ShipBuild::from_history(catalog, ledger.items().iter().cloned())?
        }
        (None, Some(ship_id)) => ShipBuild::new(
            catalog,
            &ship_id,
            request.pilot_skill.unwrap_or(STARTING_PILOT_SKILL),
        )?,
        (None, None) => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "request needs either 'ship_id' or 'history'",
            ))
        }
    };

    let id = Uuid::new_v4();
    build.subscribe(move |topic: Topic, build: &ShipBuild| {
        debug!(build = %id, %topic, ship = %build.ship().id, "build updated");
    });
    let summary = build.summary();
    lock_builds(&state)?.insert(id, build);
    info!(build = %id, ship = %summary.ship_id, "build created");

    Ok((StatusCode::CREATED, Json(CreateBuildResponse { id, build: summary })))
}

pub async fn get_build(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<BuildSummary> {
    let builds = lock_builds(&state)?;
    let build = builds.get(&id).ok_or_else(|| ApiError::build_not_found(id))?;
    Ok(Json(build.summary()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuildAction {
    BuyCard { upgrade_id: u32 },
    BuyPilotAbility { pilot_id: u32 },
    LoseCard { upgrade_id: u32 },
    LoseAbility { pilot_id: u32 },
    Equip { upgrade_id: u32 },
    EquipAbility { pilot_id: u32 },
    UnequipUpgrade { upgrade_id: u32 },
    UnequipAbility { pilot_id: u32 },
    /// Append a history entry to the ledger and apply its effect.
    Record { entry: StoredEntry },
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub build: BuildSummary,
    /// Topics announced by the action, in order. Empty when nothing changed.
    pub topics: Vec<Topic>,
}

pub async fn apply_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<BuildAction>,
) -> ApiResult<ActionResponse> {
    let mut builds = lock_builds(&state)?;
    let build = builds.get_mut(&id).ok_or_else(|| ApiError::build_not_found(id))?;

    let topic = match action {
        BuildAction::BuyCard { upgrade_id } => Some(build.buy_card(upgrade_id)?),
        BuildAction::BuyPilotAbility { pilot_id } => Some(build.buy_pilot_ability(pilot_id)?),
        BuildAction::LoseCard { upgrade_id } => Some(build.lose_card(upgrade_id)),
        BuildAction::LoseAbility { pilot_id } => Some(build.lose_ability(pilot_id)),
        BuildAction::Equip { upgrade_id } => Some(build.equip(upgrade_id)?),
        BuildAction::EquipAbility { pilot_id } => Some(build.equip_ability(pilot_id)?),
        BuildAction::UnequipUpgrade { upgrade_id } => build.unequip_upgrade(upgrade_id),
        BuildAction::UnequipAbility { pilot_id } => build.unequip_ability(pilot_id),
        BuildAction::Record { entry } => build.apply(entry.decode())?,
    };

    Ok(Json(ActionResponse {
        build: build.summary(),
        topics: topic.into_iter().collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct AvailableResponse {
    pub slot: Option<String>,
    pub upgrades: Vec<Arc<Upgrade>>,
    pub abilities: Vec<Arc<Pilot>>,
    pub can_equip_abilities: bool,
}

/// Upgrades of `slot` that may be bought, plus the abilities still for sale.
pub async fn available(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<AvailableResponse> {
    let builds = lock_builds(&state)?;
    let build = builds.get(&id).ok_or_else(|| ApiError::build_not_found(id))?;
    let upgrades = query
        .slot
        .as_deref()
        .map(|slot| build.available_to_buy(slot))
        .unwrap_or_default();
    Ok(Json(AvailableResponse {
        slot: query.slot,
        upgrades,
        abilities: build.abilities_available_to_buy(),
        can_equip_abilities: build.can_equip_abilities(),
    }))
}

#[derive(Debug, Serialize)]
pub struct DecodedLedger {
    pub entries: Vec<LabelledEntry>,
    pub total_xp: i64,
    /// Entries that did not decode to a known history item.
    pub unknown: usize,
}

pub async fn decode_ledger(
    State(state): State<AppState>,
    Json(entries): Json<Vec<StoredEntry>>,
) -> Json<DecodedLedger> {
    let ledger = XpLedger::from_stored(&entries);
    Json(DecodedLedger {
        entries: ledger.labelled(&state.catalog),
        total_xp: ledger.total_xp(&state.catalog),
        unknown: ledger.items().iter().filter(|item| item.is_unknown()).count(),
    })
}
