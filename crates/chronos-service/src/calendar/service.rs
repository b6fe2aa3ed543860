use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Deserialize;

use chronos_core::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageQuery, Paginated};
use chronos_db::db::connection::DbConnection;
use chronos_db::db::enums::{CalendarRole, Visibility};
use chronos_db::db::query::calendar::{self as calendar_query, PublicSort, SortOrder};
use chronos_db::db::query::{contains_pattern, membership};
use chronos_db::model::calendar::membership::NewCalendarMembership;
use chronos_db::model::calendar::{Calendar, CalendarChangeset, NewCalendar};

use crate::error::{ServiceError, ServiceResult};
use crate::policy;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCalendarRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

/// Partial update. Absent fields are kept; an empty `description` or `color`
/// clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCalendarRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

impl UpdateCalendarRequest {
    /// ## Errors
    /// Returns `ValidationError` if a new name is blank.
    pub fn into_changeset(self) -> ServiceResult<CalendarChangeset> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                return Err(ServiceError::ValidationError(
                    "Name must not be empty".to_string(),
                ));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        Ok(CalendarChangeset {
            name,
            description: self.description.map(non_blank),
            color: self.color.map(non_blank),
            visibility: self.visibility,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Query string of the public calendar listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: PublicSort,
    #[serde(default, alias = "sortOrder")]
    pub sort_order: SortOrder,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_page() -> u32 {
    DEFAULT_PAGE
}

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl CalendarQuery {
    #[must_use]
    pub const fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn calendar_not_found() -> ServiceError {
    ServiceError::NotFound("Calendar not found".to_string())
}

/// ## Summary
/// Loads a calendar the viewer may read.
///
/// ## Errors
/// Returns `NotFound` if the calendar does not exist and `Forbidden` if its
/// visibility hides it from the viewer.
#[tracing::instrument(skip(conn))]
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    viewer: Option<uuid::Uuid>,
) -> ServiceResult<Calendar> {
    let calendar = calendar_query::find_by_id(conn, id)
        .await?
        .ok_or_else(calendar_not_found)?;

    let is_participant = match (calendar.visibility, viewer) {
        (Visibility::Shared, Some(user_id)) => {
            membership::is_participant(conn, calendar.id, user_id).await?
        }
        _ => false,
    };

    policy::check_read_access(&calendar, viewer, is_participant)?;
    Ok(calendar)
}

/// ## Errors
/// Returns database errors.
pub async fn find_by_owner(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> ServiceResult<Vec<Calendar>> {
    Ok(calendar_query::list_by_owner(conn, owner_id).await?)
}

/// ## Summary
/// Calendars the user was invited into, excluding their own.
///
/// ## Errors
/// Returns database errors.
pub async fn find_participating(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
) -> ServiceResult<Vec<Calendar>> {
    Ok(calendar_query::list_participating(conn, user_id).await?)
}

/// ## Summary
/// Lists public calendars, optionally filtered by a case-insensitive name
/// substring.
///
/// ## Errors
/// Returns `ValidationError` for an out-of-range page or limit.
#[tracing::instrument(skip(conn))]
pub async fn find_public(
    conn: &mut DbConnection<'_>,
    query: &CalendarQuery,
) -> ServiceResult<Paginated<Calendar>> {
    let page = query.page_query();
    page.validate()?;

    let pattern = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| "%".to_string(), contains_pattern);

    let (rows, total) = calendar_query::list_public(
        conn,
        &pattern,
        query.sort_by,
        query.sort_order,
        page.offset(),
        page.limit_i64(),
    )
    .await?;

    Ok(Paginated::new(rows, total, page))
}

/// ## Summary
/// Creates a calendar owned by `owner_id`.
///
/// ## Errors
/// Returns `ValidationError` for a blank name, and database errors.
///
/// ## Side Effects
/// Inserts the calendar and the owner's membership in one transaction.
#[tracing::instrument(skip(conn, request), fields(name = %request.name))]
pub async fn create(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    request: &CreateCalendarRequest,
) -> ServiceResult<Calendar> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }
    let description = request.description.clone().and_then(non_blank);
    let color = request.color.clone().and_then(non_blank);
    let visibility = request.visibility.unwrap_or(Visibility::Private);

    let calendar = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let calendar = calendar_query::create_calendar(
                    tx,
                    &NewCalendar {
                        id: uuid::Uuid::now_v7(),
                        name: &name,
                        description: description.as_deref(),
                        color: color.as_deref(),
                        visibility,
                        owner_id,
                    },
                )
                .await?;

                membership::add_member(
                    tx,
                    &NewCalendarMembership {
                        calendar_id: calendar.id,
                        user_id: owner_id,
                        role: CalendarRole::Owner,
                    },
                )
                .await?;

                Ok(calendar)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(calendar_id = %calendar.id, "Calendar created");
    Ok(calendar)
}

async fn find_managed(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<Calendar> {
    let calendar = calendar_query::find_by_id(conn, id)
        .await?
        .ok_or_else(calendar_not_found)?;
    if !policy::can_manage(&calendar, user_id) {
        return Err(ServiceError::Forbidden(
            "Only the owner can manage this calendar".to_string(),
        ));
    }
    Ok(calendar)
}

/// ## Errors
/// Returns `NotFound` if the calendar does not exist, `Forbidden` unless the
/// user owns it, and `ValidationError` for a blank name.
#[tracing::instrument(skip(conn, request))]
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    request: UpdateCalendarRequest,
) -> ServiceResult<Calendar> {
    let calendar = find_managed(conn, id, user_id).await?;
    let changes = request.into_changeset()?;
    if changes.is_empty() {
        return Ok(calendar);
    }
    Ok(calendar_query::update_calendar(conn, id, &changes).await?)
}

/// ## Errors
/// Returns `NotFound` if the calendar does not exist and `Forbidden` unless
/// the user owns it.
///
/// ## Side Effects
/// Removes the calendar with its memberships, invitations and events.
#[tracing::instrument(skip(conn))]
pub async fn delete(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<()> {
    find_managed(conn, id, user_id).await?;
    calendar_query::delete_calendar(conn, id).await?;
    tracing::info!(calendar_id = %id, "Calendar deleted");
    Ok(())
}
