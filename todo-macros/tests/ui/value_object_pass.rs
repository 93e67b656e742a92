use todo_macros::value_object;

#[value_object]
struct Tag {
    label: String,
}

#[value_object(default = false)]
struct Percent(u8);

impl Default for Percent {
    fn default() -> Self {
        Percent(100)
    }
}

#[value_object]
enum Shade {
    #[default]
    Light,
    Dark,
}

fn main() {
    let _ = format!("{:?}", Tag::default());
    assert_eq!(Percent::default(), Percent(100));
    assert_eq!(Shade::default(), Shade::Light);
    assert_ne!(Shade::Dark, Shade::Light);
}
