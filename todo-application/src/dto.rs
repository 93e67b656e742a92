use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 分页结果
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T>
where
    T: Dto,
{
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedList<T>
where
    T: Dto,
{
    /// 从完整结果集中截取第 `page_number` 页（页码从 1 开始）
    pub fn paginate(all: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let page_number = page_number.max(1);
        let total_count = all.len() as u64;
        let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
        let skip = (page_number as usize - 1).saturating_mul(page_size as usize);

        let items = all
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Self {
            items,
            page_number,
            total_pages,
            total_count,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }
}

impl<T: Dto> Dto for PaginatedList<T> {}

/// 键值查找项（如优先级列表）
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupDto {
    pub id: i32,
    pub title: String,
}

impl Dto for LookupDto {}
