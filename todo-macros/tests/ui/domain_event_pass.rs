use todo_domain::domain_event::DomainEvent;
use todo_macros::domain_event;

#[domain_event(version = 1)]
enum NoteEvent {
    Written {
        note_id: i64,
    },
    #[event(event_type = "note.archived", event_version = 2)]
    Archived {
        note_id: i64,
    },
}

fn main() {
    let written = NoteEvent::Written {
        id: "evt-1".to_string(),
        note_id: 1,
    };
    assert_eq!(written.event_id(), "evt-1");
    assert_eq!(written.event_type(), "NoteEvent.Written");
    assert_eq!(written.event_version(), 1);

    let archived = NoteEvent::Archived {
        id: "evt-2".to_string(),
        note_id: 1,
    };
    assert_eq!(archived.event_type(), "note.archived");
    assert_eq!(archived.event_version(), 2);
    assert_eq!(NoteEvent::EVENT_TYPES, &["NoteEvent.Written", "note.archived"]);
}
