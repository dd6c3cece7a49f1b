pub mod http_executor;
pub mod session;
pub mod token_store;

pub use http_executor::HttpExecutor;
pub use session::{Session, SessionState};
pub use token_store::{MemoryTokenStore, TokenPair, TokenStore, TomlTokenStore};
