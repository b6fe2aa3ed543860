mod helpers;

mod auth;
mod calendars;
mod events;
mod invitations;
