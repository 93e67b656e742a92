use todo_macros::entity_id;

/// 待办清单标识，由存储在新增时分配（> 0）
#[entity_id]
pub struct ListId(i64);

/// 待办事项标识，由存储在新增时分配（> 0）
#[entity_id]
pub struct ItemId(i64);

impl ListId {
    /// 是否已由存储分配
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}

impl ItemId {
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}
