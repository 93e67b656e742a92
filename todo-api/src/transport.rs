//! 传输适配：HTTP 请求 → 调用上下文，调度结果 → HTTP 响应
//!
//! 所有入口共用一张状态码映射表：
//!
//! | 结果 | 状态码 |
//! |---|---|
//! | 成功且有值 | 200（JSON） |
//! | 成功无值 | 204 |
//! | `NotFound` | 404 |
//! | `Validation` | 400（字段错误明细） |
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | 其余 | 500（不暴露内部细节） |
//!
use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use todo_application::{
    context::{AppContext, Subject},
    dto::{Dto, PaginatedList},
    error::AppError,
    request::Request,
    todo_lists::{TodoListDto, TodosVm},
};
use todo_domain::todo::{ItemId, ListId};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::state::AppState;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

const VALIDATION_TITLE: &str = "One or more validation errors occurred.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// 面向 HTTP 的错误包装
#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ValidationProblem<'a> {
    title: &'static str,
    errors: &'a BTreeMap<String, Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            AppError::Validation(errors) => {
                let body = ValidationProblem {
                    title: VALIDATION_TITLE,
                    errors: errors.as_map(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            other => {
                tracing::error!(error = %other, "request failed unexpectedly");
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE).into_response()
            }
        }
    }
}

/// 成功结果到响应的转换：有值 200 + JSON，无值 204
pub trait IntoReply {
    fn into_reply(self) -> Response;
}

impl IntoReply for () {
    fn into_reply(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

macro_rules! json_reply {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReply for $ty {
                fn into_reply(self) -> Response {
                    (StatusCode::OK, Json(self)).into_response()
                }
            }
        )*
    };
}

json_reply!(ListId, ItemId, TodosVm, TodoListDto);

impl<T: Dto> IntoReply for PaginatedList<T> {
    fn into_reply(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// 经调度器执行请求并按映射表生成响应
pub async fn send<R>(state: &AppState, call: &CallContext, request: R) -> ApiResult<Response>
where
    R: Request,
    R::Response: IntoReply,
{
    let value = state.dispatcher.dispatch(&call.ctx, request).await?;
    Ok(value.into_reply())
}

/// 单次 HTTP 调用的上下文
///
/// 主体来自认证中间件写入的扩展；关联 ID 取自 `x-correlation-id` 头，缺省时生成。
/// 处理函数被丢弃（如客户端断开）时取消令牌随之触发。
pub struct CallContext {
    pub ctx: AppContext,
    _cancel_on_drop: DropGuard,
}

impl CallContext {
    fn from_parts(parts: &Parts) -> Self {
        let token = CancellationToken::new();
        let mut ctx = AppContext::default().with_cancellation(token.clone());
        ctx.subject = parts.extensions.get::<Subject>().cloned();
        if let Some(correlation_id) = correlation_id(&parts.headers) {
            ctx = ctx.with_correlation_id(correlation_id);
        }
        Self {
            ctx,
            _cancel_on_drop: token.drop_guard(),
        }
    }
}

impl FromRequestParts<AppState> for CallContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CallContext::from_parts(parts))
    }
}

fn correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
