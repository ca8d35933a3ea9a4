// =============================================================================
// GOOGLE SHEETS MODULE
// =============================================================================
//
// Fetches the monster sheet. This lives in the infra layer because it does
// external I/O (HTTP requests to Google APIs). The core layer only sees a
// grid of strings through the `SheetSource` trait.

pub mod google_auth;
pub mod google_sheets_client;

#[cfg(test)]
mod test_http;

pub use google_auth::{AuthorizedUserAuth, ServiceAccountAuth};
pub use google_sheets_client::{GoogleSheetsClient, SheetsCredentials};
