use serde::{Deserialize, Serialize};
use todo_domain::domain_event::EventContext;
use tokio_util::sync::CancellationToken;

/// 已认证的调用主体
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// 应用层上下文（Application Context）
///
/// 承载一次调度所需的横切信息：
/// - 调用主体（`subject`）：由认证中间件填充，匿名调用为 `None`；
/// - 关联ID（`correlation_id`）：写入日志与事件记录；
/// - 取消令牌（`cancellation`）：调用方断开或超时时由上层取消。
///
/// ```rust
/// use todo_application::context::{AppContext, Subject};
///
/// let ctx = AppContext::for_subject(Subject::new("u-1").with_role("Administrator"))
///     .with_correlation_id("cor-123");
/// assert_eq!(ctx.actor_id(), Some("u-1"));
/// ```
#[derive(Clone, Debug)]
pub struct AppContext {
    pub subject: Option<Subject>,
    pub correlation_id: String,
    pub cancellation: CancellationToken,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            subject: None,
            correlation_id: uuid::Uuid::new_v4().to_string(),
            cancellation: CancellationToken::new(),
        }
    }
}

impl AppContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_subject(subject: Subject) -> Self {
        Self {
            subject: Some(subject),
            ..Self::default()
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.subject.as_ref().map(|s| s.id.as_str())
    }

    /// 事件记录使用的上下文
    pub fn event_context(&self) -> EventContext {
        EventContext::builder()
            .correlation_id(self.correlation_id.clone())
            .maybe_actor_id(self.actor_id().map(str::to_string))
            .build()
    }
}
