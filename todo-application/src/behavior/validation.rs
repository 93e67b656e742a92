use super::{Behavior, Next, Outcome};
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    request::Request,
    validation::{ValidationErrors, Validator},
};
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

trait ErasedValidator: Send + Sync {
    fn validate(&self, request: &dyn Any, errors: &mut ValidationErrors);
}

struct Typed<R, V> {
    inner: V,
    _request: PhantomData<fn(R)>,
}

impl<R, V> ErasedValidator for Typed<R, V>
where
    R: Request,
    V: Validator<R>,
{
    fn validate(&self, request: &dyn Any, errors: &mut ValidationErrors) {
        if let Some(request) = request.downcast_ref::<R>() {
            self.inner.validate(request, errors);
        }
    }
}

/// 执行请求类型对应的全部校验器，汇总字段错误
#[derive(Clone, Default)]
pub struct ValidationBehavior {
    validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
}

impl ValidationBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为请求类型追加校验器（同一类型可追加多个）
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        self.validators
            .entry(TypeId::of::<R>())
            .or_default()
            .push(Arc::new(Typed {
                inner: validator,
                _request: PhantomData,
            }));
        self
    }

    pub fn validator_count<R: Request>(&self) -> usize {
        self.validators
            .get(&TypeId::of::<R>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl Behavior for ValidationBehavior {
    fn name(&self) -> &'static str {
        "validation"
    }

    async fn handle(&self, _ctx: &AppContext, next: Next<'_>) -> AppResult<Outcome> {
        let envelope = next.request();
        if let Some(validators) = self.validators.get(&envelope.type_id()) {
            let mut errors = ValidationErrors::new();
            for v in validators {
                v.validate(envelope.payload_any(), &mut errors);
            }
            if !errors.is_empty() {
                return Err(AppError::Validation(errors));
            }
        }
        next.run().await
    }
}
