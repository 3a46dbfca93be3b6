// The infra module contains the HTTP clients and the auth flow.
// Each remote service gets its own submodule.

#[path = "auth/service_account.rs"]
pub mod auth;

#[path = "drive/drive_client.rs"]
pub mod drive;

#[path = "sheets/sheets_client.rs"]
pub mod sheets;

#[path = "slides/slides_client.rs"]
pub mod slides;
