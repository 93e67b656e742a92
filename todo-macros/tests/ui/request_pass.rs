use todo_application::request::Request;
use todo_macros::request;

#[request(response = Vec<String>)]
struct ListTags {
    prefix: String,
}

#[request(name = "Ping")]
struct HealthPing;

fn main() {
    assert_eq!(ListTags::NAME, "ListTags");
    assert_eq!(HealthPing::NAME, "Ping");

    let req = ListTags { prefix: "a".into() };
    let _ = format!("{:?}", req.clone());
    let _empty: <HealthPing as Request>::Response = ();
    let _tags: <ListTags as Request>::Response = Vec::new();
}
