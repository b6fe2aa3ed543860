/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const USER_ROUTE_COMPONENT: &str = "user";
pub const CALENDARS_ROUTE_COMPONENT: &str = "calendars";
pub const CALENDAR_INVITATIONS_ROUTE_COMPONENT: &str = "calendar-invitations";
pub const EVENTS_ROUTE_COMPONENT: &str = "events";

pub const AUTH_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);
pub const CALENDARS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CALENDARS_ROUTE_COMPONENT);
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

/// Client-facing paths embedded in mailed links.
pub const CLIENT_ACTIVATE_PATH: &str = "/auth/activate";
pub const CLIENT_RESET_PASSWORD_PATH: &str = "/auth/reset-password";
