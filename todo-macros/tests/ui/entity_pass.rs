use todo_domain::entity::Entity;
use todo_macros::{entity, entity_id};

#[entity_id]
struct NoteId(i64);

#[entity(id = NoteId)]
struct Note {
    body: String,
}

#[entity(id = NoteId, debug = false)]
struct Draft {
    body: String,
}

impl std::fmt::Debug for Draft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Draft(..)")
    }
}

fn main() {
    // id 字段由宏追加在最前
    let note = Note {
        id: NoteId::from(3),
        body: "call mum".into(),
    };
    assert_eq!(note.id().to_string(), "3");
    assert_eq!(note.clone(), note);

    let draft = Draft {
        id: NoteId::default(),
        body: String::new(),
    };
    let _ = format!("{draft:?} {}", draft.body);
}
