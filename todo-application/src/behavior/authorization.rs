use super::{Behavior, Next, Outcome};
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    request::Request,
};
use async_trait::async_trait;
use std::any::TypeId;
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct Protection {
    role: Option<String>,
}

/// 受保护的请求类型及其所需角色
#[derive(Clone, Debug, Default)]
pub struct AuthorizationPolicy {
    protected: HashMap<TypeId, Protection>,
}

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// 要求已认证主体
    pub fn protect<R: Request>(mut self) -> Self {
        self.protected
            .entry(TypeId::of::<R>())
            .or_insert(Protection { role: None });
        self
    }

    /// 要求已认证主体且具备指定角色
    pub fn require_role<R: Request>(mut self, role: impl Into<String>) -> Self {
        self.protected.insert(
            TypeId::of::<R>(),
            Protection {
                role: Some(role.into()),
            },
        );
        self
    }

    fn check(&self, type_id: TypeId, request: &str, ctx: &AppContext) -> AppResult<()> {
        let Some(protection) = self.protected.get(&type_id) else {
            return Ok(());
        };

        let Some(subject) = ctx.subject.as_ref() else {
            return Err(AppError::Unauthorized);
        };

        match &protection.role {
            Some(role) if !subject.has_role(role) => Err(AppError::Forbidden(format!(
                "{request} requires role {role}"
            ))),
            _ => Ok(()),
        }
    }
}

/// 受保护请求在无主体时短路为 `Unauthorized`，角色不足时为 `Forbidden`
#[derive(Clone, Debug, Default)]
pub struct AuthorizationBehavior {
    policy: AuthorizationPolicy,
}

impl AuthorizationBehavior {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Behavior for AuthorizationBehavior {
    fn name(&self) -> &'static str {
        "authorization"
    }

    async fn handle(&self, ctx: &AppContext, next: Next<'_>) -> AppResult<Outcome> {
        let envelope = next.request();
        self.policy
            .check(envelope.type_id(), envelope.name(), ctx)?;
        next.run().await
    }
}
