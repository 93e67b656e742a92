use std::str::FromStr;
use todo_macros::entity_id;

#[entity_id]
struct ListId(i64);

#[entity_id]
struct Slug(String);

fn main() {
    // 整数标识派生 Copy
    let id = ListId::from_str("7").unwrap();
    let copied = id;
    assert_eq!(id, copied);
    assert_eq!(id.to_string(), "7");
    assert_eq!(i64::from(id), 7);

    let slug = Slug::from(String::from("groceries"));
    let _ = format!("{slug:?}");
    assert!(ListId::default() < ListId::from(1));
}
