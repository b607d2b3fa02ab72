//! FairStay damage inspection client
//!
//! セッション確保・画像アップロード・AI損傷解析・レポート取得・共有・アンケートを
//! 1つのAPIクライアントにまとめる。

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod report;
pub mod session;
pub mod share;
pub mod survey;
pub mod transport;
pub mod upload;
pub mod workflow;

pub use client::ApiClient;
pub use config::{ApiConfig, ApiEnvironment, TimeoutBudget};
pub use error::{FairstayError, Result, UploadStage};
pub use session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};
pub use upload::UploadStrategy;
pub use workflow::{Inspection, Inspector};
