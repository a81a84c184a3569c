use std::sync::Arc;

use serde_json::{Map, Value, json};
use tempfile::TempDir;

use formfill_core::session::{
    AgentLogEntry, AgentLogKind, FormField, MessageRole, MessageStatus, Session, SessionStore,
    new_message, new_session,
};
use formfill_core::storage::KeyValueStorage;
use formfill_infrastructure::{
    JsonFileStorage, LocalSessionStore, MemoryAddressBar, MemoryStorage, UrlSessionCorrelator,
};

fn tool_input(field_id: &str, value: &str) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("field_id".to_string(), json!(field_id));
    input.insert("value".to_string(), json!(value));
    input
}

fn w9_fields() -> Vec<FormField> {
    let mut name = FormField::new("f1_01", "text", 0);
    name.set("label_context", "Name (as shown on your income tax return)");
    let mut class = FormField::new("c1_1", "checkbox", 0);
    class.set("rect", json!([10, 20, 30, 40]));
    vec![name, class]
}

#[test]
fn test_session_survives_a_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("local_storage.json");

    let mut session = Session::restore("s1", w9_fields(), Vec::new());
    session.push_message(new_message(MessageRole::User, "Hello", None));
    let mut reply = new_message(
        MessageRole::Assistant,
        "Filling field X",
        Some(MessageStatus::Complete),
    );
    reply.push_log(AgentLogEntry::new(AgentLogKind::Thinking, "Looking at the form"));
    reply.push_log(AgentLogEntry::tool_call(
        "set_field",
        tool_input("f1_01", "Ada Lovelace"),
        "Setting name",
    ));
    session.push_message(reply);

    LocalSessionStore::new(Arc::new(JsonFileStorage::new(&path))).save(&session, Some("backend-42"));

    // A new store over the same file stands in for a page reload.
    let reloaded = LocalSessionStore::new(Arc::new(JsonFileStorage::new(&path)));
    let loaded = reloaded.load("s1").expect("session should be cached");

    assert_eq!(loaded.id, "s1");
    assert_eq!(loaded.user_session_id.as_deref(), Some("backend-42"));
    assert_eq!(loaded.fields, session.fields);
    assert_eq!(loaded.messages, session.messages);

    let log = loaded.messages[1].agent_log.as_ref().unwrap();
    assert_eq!(log[1].kind, AgentLogKind::ToolCall);
    assert_eq!(log[1].tool_name.as_deref(), Some("set_field"));
    assert_eq!(
        log[1].tool_input.as_ref().unwrap().get("value"),
        Some(&json!("Ada Lovelace"))
    );

    let restored = loaded.into_session();
    assert!(restored.filled_pdf_bytes.is_none());
    assert!(restored.original_pdf.is_none());
    assert!(!restored.is_processing);
}

#[test]
fn test_retention_keeps_the_ten_most_recent_first_saves() {
    let store = LocalSessionStore::new(Arc::new(MemoryStorage::new()));
    for i in 1..=11 {
        store.save(&Session::restore(format!("s{i}"), Vec::new(), Vec::new()), None);
    }

    assert!(store.load("s1").is_none());
    for i in 2..=11 {
        assert!(store.load(&format!("s{i}")).is_some(), "s{i} should be cached");
    }

    // Re-saving an old session does not move it to the back.
    store.save(&Session::restore("s2", Vec::new(), Vec::new()), Some("late"));
    store.save(&Session::restore("s12", Vec::new(), Vec::new()), None);
    assert!(store.load("s2").is_none());
    assert!(store.load("s3").is_some());
}

#[test]
fn test_load_unknown_id() {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalSessionStore::new(storage.clone());
    assert!(store.load("nonexistent").is_none());

    storage.set_item(store.storage_key(), "not json at all").unwrap();
    assert!(store.load("nonexistent").is_none());
}

#[test]
fn test_bucket_is_readable_by_the_browser_client() {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalSessionStore::new(storage.clone());

    let mut session = Session::restore("s1", Vec::new(), Vec::new());
    session.push_message(new_message(MessageRole::User, "Hello", None));
    store.save(&session, Some("backend-42"));

    let raw = storage.get_item("form-filler-sessions").unwrap().unwrap();
    let bucket: Value = serde_json::from_str(&raw).unwrap();
    let entry = &bucket["s1"];

    assert_eq!(entry["id"], json!("s1"));
    assert_eq!(entry["userSessionId"], json!("backend-42"));
    assert_eq!(entry["messages"][0]["role"], json!("user"));
    assert!(entry["messages"][0]["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(entry["messages"][0].get("agentLog").is_none());
    assert!(entry.get("filledPdfBytes").is_none());
}

#[test]
fn test_bucket_written_by_the_browser_client_loads() {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalSessionStore::new(storage.clone());

    let bucket = json!({
        "abc": {
            "id": "abc",
            "fields": [{ "field_id": "f1", "field_type": "text", "page": 0 }],
            "messages": [{
                "id": "m1",
                "role": "assistant",
                "content": "Done",
                "timestamp": "2024-05-01T12:00:00.123Z",
                "status": "complete",
                "agentLog": [{
                    "id": "l1",
                    "type": "tool_result",
                    "timestamp": "2024-05-01T12:00:00.456Z",
                    "content": "ok"
                }]
            }]
        }
    });
    storage
        .set_item(store.storage_key(), &bucket.to_string())
        .unwrap();

    let loaded = store.load("abc").unwrap();
    assert!(loaded.user_session_id.is_none());
    assert_eq!(loaded.messages[0].status, Some(MessageStatus::Complete));
    let entry = &loaded.messages[0].agent_log.as_ref().unwrap()[0];
    assert_eq!(entry.kind, AgentLogKind::ToolResult);
    assert_eq!(
        entry.timestamp.timestamp_subsec_millis(),
        456,
        "milliseconds should be kept"
    );
}

#[test]
fn test_round_trip_across_chat_sizes() {
    let store = LocalSessionStore::new(Arc::new(MemoryStorage::new()));

    for message_count in [0usize, 1, 7, 50] {
        let mut session = new_session();
        for i in 0..message_count {
            let role = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            let mut message = new_message(role, format!("message {i}"), None);
            let log_count = i % 6;
            if log_count > 0 {
                for j in 0..log_count {
                    message.push_log(
                        AgentLogEntry::new(AgentLogKind::Status, format!("step {j}"))
                            .with_details("details"),
                    );
                }
            } else if i % 4 == 0 {
                message.agent_log = Some(Vec::new());
            }
            session.push_message(message);
        }

        store.save(&session, None);
        let loaded = store.load(session.id()).unwrap();
        assert_eq!(loaded.messages, session.messages, "{message_count} messages");
    }
}

#[test]
fn test_url_and_store_correlate_a_session() {
    let bar = Arc::new(MemoryAddressBar::new("https://fill.example/").unwrap());
    let correlator = UrlSessionCorrelator::new(bar.clone());
    let store = LocalSessionStore::new(Arc::new(MemoryStorage::new()));

    let session = new_session();
    correlator.set_session_id_in_url(session.id());
    store.save(&session, Some("backend-7"));

    // Reload: a fresh correlator over the same address.
    let id = UrlSessionCorrelator::new(bar)
        .get_session_id_from_url()
        .unwrap();
    assert_eq!(id, session.id());
    assert_eq!(
        store.load(&id).unwrap().user_session_id.as_deref(),
        Some("backend-7")
    );
}

#[test]
fn test_backend_field_nulls_survive_the_store() {
    let store = LocalSessionStore::new(Arc::new(MemoryStorage::new()));
    let raw = json!({
        "field_id": "page0_name",
        "field_type": "text",
        "page": 0,
        "label_context": "Name",
        "current_value": null,
        "options": null
    });
    let session = Session::restore("s1", vec![FormField::from_value(raw.clone())], Vec::new());

    store.save(&session, None);

    let loaded = store.load("s1").unwrap();
    assert_eq!(loaded.fields[0].as_value(), &raw);
}

#[test]
fn test_unfamiliar_field_shape_does_not_hide_the_chat() {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalSessionStore::new(storage.clone());

    let bucket = json!({
        "s1": {
            "id": "s1",
            "fields": [
                { "name": "x", "value": 1 },
                { "field_id": "f2", "page": -1, "current_value": true }
            ],
            "messages": [{
                "id": "m1",
                "role": "user",
                "content": "Hello",
                "timestamp": "2024-05-01T12:00:00.000Z"
            }]
        }
    });
    storage
        .set_item(store.storage_key(), &bucket.to_string())
        .unwrap();

    let loaded = store.load("s1").expect("session should load");
    assert_eq!(loaded.messages[0].content, "Hello");
    assert_eq!(loaded.fields.len(), 2);
    assert_eq!(loaded.fields[0].field_id(), None);
    assert_eq!(loaded.fields[1].as_value(), &bucket["s1"]["fields"][1]);
}
