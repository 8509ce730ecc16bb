//! Request Extractors
//!
//! 调用者身份：上游网关完成令牌校验后，以 `x-user-id` 头下发用户 ID。

use axum::extract::FromRequestParts;
use http::HeaderName;
use http::request::Parts;

use crate::core::ServerState;
use crate::utils::AppError;

static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// 当前调用者
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(&USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::invalid("Missing x-user-id header"))?;

        Ok(CurrentUser { id: id.to_string() })
    }
}
