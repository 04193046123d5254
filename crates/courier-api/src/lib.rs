pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod users;

use std::sync::Arc;

use courier_auth::CredentialService;
use courier_db::Database;
use courier_notify::dispatcher::Dispatcher;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub creds: CredentialService,
    pub dispatcher: Dispatcher,
}
