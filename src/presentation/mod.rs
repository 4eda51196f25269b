pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Environment, Settings};
pub use dispatcher::{Route, dispatch};
pub use envelope::{ApiResponse, GatewayEvent, GatewayResponse, InboundRequest};
pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use state::AppState;
