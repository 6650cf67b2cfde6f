pub mod builder;
pub mod handler;
pub mod listener;

pub use builder::ServerBuilder;
pub use handler::AppService;
pub use listener::Accept;

use crate::config::Environment;
use crate::security::{HeaderRules, SecurityHeaders, SecurityHeadersLayer};
use crate::state::AppState;
use tower::Layer;

/// The application service with security headers applied to every route.
pub fn build_service(
    environment: Environment,
    state: AppState,
) -> SecurityHeaders<AppService> {
    let rules = HeaderRules::for_environment(environment);
    SecurityHeadersLayer::new(rules).layer(AppService::new(state))
}
