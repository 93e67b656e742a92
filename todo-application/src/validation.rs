//! 校验（Validation）
//!
//! 校验器按请求类型注册，每个请求类型可有多个；校验行为汇总全部字段错误后
//! 一次性返回 `AppError::Validation`。
//!
use crate::request::Request;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 字段 → 错误消息列表
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// 条件不成立时记录错误
    pub fn ensure(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

/// 请求校验器，纯函数，不访问存储
pub trait Validator<R>: Send + Sync
where
    R: Request,
{
    fn validate(&self, request: &R, errors: &mut ValidationErrors);
}

/// 标题规则：必填、最长 200 字符
pub fn check_title(errors: &mut ValidationErrors, field: &str, title: &str) {
    const MAX_TITLE_LEN: usize = 200;

    if title.trim().is_empty() {
        errors.add(field, "Title is required.");
    }
    errors.ensure(
        title.chars().count() <= MAX_TITLE_LEN,
        field,
        format!("Title must not exceed {MAX_TITLE_LEN} characters."),
    );
}
