//! 实体（Entity）基础抽象
//!
//! 实体以标识区分；标识在加入存储时由存储分配。
//!
use std::{fmt::Display, hash::Hash, str::FromStr};

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可哈希
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}
