//! HTTP handler functions for the HSO dashboard API.

use actix_web::{HttpResponse, web};
use chrono::Local;
use hso_dashboard::LoadState;
use hso_dashboard::analytics_view::{AnalyticsSnapshot, load_breakdown};
use hso_dashboard::feed::{
    AnnouncementFilter, ProgramSort, announcement_page, load_announcements, load_programs,
    program_page,
};
use hso_dashboard::incident_queue::{self, DepartmentQueue, StatusFilter};
use hso_dashboard::settings::DashboardSettings;
use hso_dashboard::summary::load_summary;
use hso_database::DbError;
use hso_database_models::NewAnnouncement;
use hso_incident_models::{IncidentFilter, IncidentId, IncidentStatus, IncidentUpdate, Office};
use hso_listing::{DEFAULT_PER_PAGE, ListQuery};
use hso_server_models::{
    AnnouncementQueryParams, ApiAnalytics, ApiHealth, ApiListing, ApiLoadStatus, ApiSummary,
    AssignRequest, ForwardRequest, IncidentQueryParams, ProgramQueryParams, QueueQueryParams,
};

use crate::{ApiError, AppState};

/// Accepts an office slug (`gsd`) or its full name.
fn parse_office(raw: &str) -> Option<Office> {
    Office::from_slug(raw).or_else(|| raw.parse().ok())
}

fn office_from_path(raw: &str) -> Result<Office, ApiError> {
    parse_office(raw).ok_or_else(|| ApiError::UnknownOffice {
        office: raw.to_string(),
    })
}

/// Treats an empty query parameter as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/analytics/monthly`
///
/// Monthly incident counts per status, with chart datasets. A failed
/// fetch still answers `200` with all-zero data and `status: "failed"`.
pub async fn monthly_analytics(state: web::Data<AppState>) -> HttpResponse {
    let loaded = load_breakdown(state.incidents.as_ref(), &Local).await;
    let load = ApiLoadStatus::from(&loaded);
    let breakdown = loaded.into_value().unwrap_or_default();

    HttpResponse::Ok().json(ApiAnalytics {
        load,
        snapshot: AnalyticsSnapshot::from(breakdown),
    })
}

/// `GET /api/dashboard/summary`
///
/// Answers `200` even when a fetch fails; `status: "failed"` and `error`
/// name the counters that were zeroed.
pub async fn dashboard_summary(state: web::Data<AppState>) -> HttpResponse {
    let loaded = load_summary(state.incidents.as_ref(), state.accounts.as_ref(), &Local).await;
    let load = ApiLoadStatus::from(&loaded);

    HttpResponse::Ok().json(ApiSummary {
        load,
        summary: loaded.into_value().unwrap_or_default(),
    })
}

/// `GET /api/incidents`
///
/// Incidents matching the optional `status` and `office` equality filters.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let mut filter = IncidentFilter::all();
    if let Some(raw) = non_empty(params.status.as_deref()) {
        let status = IncidentStatus::from_label(raw)
            .ok_or_else(|| ApiError::bad_request(format!("unknown status {raw:?}")))?;
        filter = filter.with_status(status);
    }
    if let Some(raw) = non_empty(params.office.as_deref()) {
        let office = parse_office(raw)
            .ok_or_else(|| ApiError::bad_request(format!("unknown office {raw:?}")))?;
        filter = filter.with_office(office);
    }

    let rows = state.incidents.query_incidents(&filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// `PATCH /api/incidents/{id}`
pub async fn update_incident(
    state: web::Data<AppState>,
    path: web::Path<String>,
    update: web::Json<IncidentUpdate>,
) -> Result<HttpResponse, ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request("update sets no fields"));
    }
    let id = IncidentId::new(path.into_inner());
    let updated = state.incidents.update_incident(&id, &update).await?;
    log::info!("updated incident {id}");
    Ok(HttpResponse::Ok().json(updated))
}

/// `POST /api/incidents/{id}/assign`
///
/// Dispatches an incident to a department.
pub async fn assign_incident(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AssignRequest>,
) -> Result<HttpResponse, ApiError> {
    let office = parse_office(&body.office)
        .ok_or_else(|| ApiError::bad_request(format!("unknown office {:?}", body.office)))?;
    let id = IncidentId::new(path.into_inner());
    let updated = incident_queue::assign(state.incidents.as_ref(), &id, office).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// `GET /api/queue/{office}`
///
/// The office's in-progress incidents, searched and paged.
pub async fn queue(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<QueueQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let office = office_from_path(&path)?;
    let raw_status = params.status.as_deref().unwrap_or_default();
    let status = StatusFilter::parse(raw_status)
        .ok_or_else(|| ApiError::bad_request(format!("unknown status {raw_status:?}")))?;
    let query = ListQuery::default()
        .search(params.search.as_deref().unwrap_or_default())
        .page(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(DEFAULT_PER_PAGE),
        );

    let loaded = DepartmentQueue::load(state.incidents.as_ref(), office).await;
    let load = ApiLoadStatus::from(&loaded);
    let queue = loaded
        .into_value()
        .unwrap_or_else(|| DepartmentQueue::from_records(office, Vec::new()));

    Ok(HttpResponse::Ok().json(ApiListing {
        load,
        page: queue.view(&query, status),
    }))
}

/// `POST /api/queue/{office}/{id}/forward`
///
/// Resolves an incident from the office's queue and hands it back to the
/// Health and Safety Office.
pub async fn forward_incident(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<ForwardRequest>,
) -> Result<HttpResponse, ApiError> {
    let (office, id) = path.into_inner();
    let office = office_from_path(&office)?;
    let id = IncidentId::new(id);

    let mut queue = match DepartmentQueue::load(state.incidents.as_ref(), office).await {
        LoadState::Ready(queue) => queue,
        LoadState::Failed { reason, .. } => return Err(ApiError::Unavailable { message: reason }),
        LoadState::Cancelled => {
            return Err(ApiError::Unavailable {
                message: "queue load cancelled".to_string(),
            });
        }
    };
    if !queue.items().iter().any(|record| record.id == id) {
        return Err(DbError::NotFound { id: id.to_string() }.into());
    }

    let updated = queue
        .forward_resolved(state.incidents.as_ref(), &id, body.action_taken.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// `GET /api/announcements`
pub async fn announcements(
    state: web::Data<AppState>,
    params: web::Query<AnnouncementQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = match non_empty(params.filter.as_deref()) {
        Some(raw) => raw
            .parse::<AnnouncementFilter>()
            .map_err(|_| ApiError::bad_request(format!("unknown filter {raw:?}")))?,
        None => AnnouncementFilter::default(),
    };
    let per_page = params
        .per_page
        .unwrap_or_else(|| state.settings().settings().announcements_per_page);

    let loaded = load_announcements(state.bulletins.as_ref()).await;
    let load = ApiLoadStatus::from(&loaded);
    let items = loaded.into_value().unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiListing {
        load,
        page: announcement_page(
            &items,
            params.search.as_deref().unwrap_or_default(),
            filter,
            params.page.unwrap_or(1),
            per_page,
        ),
    }))
}

/// `POST /api/announcements`
pub async fn create_announcement(
    state: web::Data<AppState>,
    body: web::Json<NewAnnouncement>,
) -> Result<HttpResponse, ApiError> {
    let created = state.bulletins.insert_announcement(&body).await?;
    log::info!("created announcement {}", created.id);
    Ok(HttpResponse::Created().json(created))
}

/// `GET /api/programs`
pub async fn programs(
    state: web::Data<AppState>,
    params: web::Query<ProgramQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let sort = match non_empty(params.sort.as_deref()) {
        Some(raw) => raw
            .parse::<ProgramSort>()
            .map_err(|_| ApiError::bad_request(format!("unknown sort {raw:?}")))?,
        None => ProgramSort::default(),
    };
    let per_page = params
        .per_page
        .unwrap_or_else(|| state.settings().settings().programs_per_page);

    let loaded = load_programs(state.bulletins.as_ref()).await;
    let load = ApiLoadStatus::from(&loaded);
    let items = loaded.into_value().unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiListing {
        load,
        page: program_page(
            &items,
            params.search.as_deref().unwrap_or_default(),
            sort,
            params.page.unwrap_or(1),
            per_page,
        ),
    }))
}

/// `GET /api/settings`
pub async fn get_settings(state: web::Data<AppState>) -> HttpResponse {
    let settings = state.settings().settings().clone();
    HttpResponse::Ok().json(settings)
}

/// `PUT /api/settings`
///
/// Replaces the settings and saves them if they changed. The file is
/// written synchronously while the settings lock is held. If the write
/// fails the response is `500` and the previous settings stay in effect.
pub async fn put_settings(
    state: web::Data<AppState>,
    body: web::Json<DashboardSettings>,
) -> Result<HttpResponse, ApiError> {
    let saved = state.settings().replace(body.into_inner())?.clone();
    Ok(HttpResponse::Ok().json(saved))
}
