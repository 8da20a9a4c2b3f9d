pub mod errors;
pub mod events;
pub mod types;

pub use errors::{AuthError, ConfigError, GatewayError, MinervaError, PlatformError};
pub use events::{Event, EventBus};
pub use types::{Session, SESSION_TTL_SECS};

pub type Result<T> = std::result::Result<T, MinervaError>;
