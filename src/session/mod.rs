//! セッション管理
//!
//! 保存済みのセッションIDがあれば再利用し、なければサーバーで発行して保存する。
//! 有効期限はクライアント側では判定しない（参考値として返すのみ）。
//!
//! 保存が終わる前に2つの呼び出しが同時に走ると、セッションが2つ発行されうる
//! （後に書いた方が残る）。サーバーが正なので許容している。

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_STORAGE_KEY};

use crate::client::ApiClient;
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::RequestBody;
use fairstay_common::{ApiError, Session, UserType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type: Option<UserType>,
}

/// セッション発行レスポンス
///
/// `{sessionId, expiresAt}` を直接返すサーバーと
/// `{session: {...}}` で包んで返すサーバーがある。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SessionPayload {
    Nested { session: Session },
    Flat(Session),
}

impl SessionPayload {
    fn into_session(self) -> Session {
        match self {
            SessionPayload::Nested { session } | SessionPayload::Flat(session) => session,
        }
    }
}

impl ApiClient {
    /// セッションを新規発行（保存はしない）
    pub async fn create_session(&self, user_type: Option<UserType>) -> Result<Session> {
        let body = serde_json::to_value(CreateSessionRequest { user_type })?;
        let endpoint = Endpoint::CreateSession;

        let payload: SessionPayload = self
            .call(endpoint, RequestBody::Json(body))
            .await
            .map_err(FairstayError::SessionCreation)?;

        let mut session = payload.into_session();
        if session.session_id.trim().is_empty() {
            return Err(FairstayError::SessionCreation(ApiError::server(
                None,
                endpoint.fallback_message(),
            )));
        }
        if session.user_type.is_none() {
            session.user_type = user_type;
        }

        Ok(session)
    }
}

pub struct SessionManager {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// 保存済みのセッションID
    pub fn cached_session_id(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(SESSION_STORAGE_KEY)?
            .filter(|id| !id.trim().is_empty()))
    }

    /// セッションを取得（なければ発行して保存）
    pub async fn ensure_session(&self, preferred_user_type: Option<UserType>) -> Result<Session> {
        if let Some(session_id) = self.cached_session_id()? {
            debug!("reusing cached session {}", session_id);
            return Ok(Session::cached(session_id));
        }

        info!("creating new session");
        let session = self.client.create_session(preferred_user_type).await?;

        self.store
            .set(SESSION_STORAGE_KEY, &session.session_id)
            .map_err(|e| {
                FairstayError::SessionCreation(ApiError::application(format!(
                    "세션을 저장할 수 없습니다: {}",
                    e
                )))
            })?;

        info!("session created: {}", session.session_id);
        Ok(session)
    }

    /// 保存済みのセッションを破棄（次回 ensure_session で再発行）
    pub fn reset_session(&self) -> Result<()> {
        self.store.remove(SESSION_STORAGE_KEY)
    }
}
