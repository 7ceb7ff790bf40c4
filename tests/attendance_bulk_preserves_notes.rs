use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn attendanced");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn bulk_mark_overwrites_status_and_keeps_notes() {
    let workspace = temp_dir("attendance-bulk-notes");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    for (i, (name, id)) in [("Ana", "a"), ("Ben", "b"), ("Cleo", "c")].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("add-{i}"),
            "roster.add",
            json!({ "name": name, "id": id }),
        );
    }

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "note",
        "attendance.setRecord",
        json!({
            "date": "2024-03-15",
            "studentId": "b",
            "status": "absent",
            "note": "left early"
        }),
    );

    let bulk = request_ok(
        &mut stdin,
        &mut reader,
        "bulk",
        "attendance.bulkSetStatus",
        json!({ "date": "2024-03-15", "status": "present" }),
    );
    assert_eq!(bulk.get("updated").and_then(|v| v.as_u64()), Some(3));

    let day = request_ok(
        &mut stdin,
        &mut reader,
        "day",
        "attendance.day",
        json!({ "date": "2024-03-15" }),
    );
    let rows = day
        .get("rows")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(
            row.get("status").and_then(|v| v.as_str()),
            Some("present"),
            "every student is marked present: {row}"
        );
    }
    let ben = rows
        .iter()
        .find(|r| r.get("id").and_then(|v| v.as_str()) == Some("b"))
        .expect("ben row");
    assert_eq!(ben.get("note").and_then(|v| v.as_str()), Some("left early"));
}

#[test]
fn bulk_mark_on_empty_roster_is_a_noop() {
    let workspace = temp_dir("attendance-bulk-empty");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let bulk = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.bulkSetStatus",
        json!({ "date": "2024-03-15", "status": "absent" }),
    );
    assert_eq!(bulk.get("updated").and_then(|v| v.as_u64()), Some(0));

    // No day is created by the no-op.
    let overview = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "overview.get",
        json!({ "date": "2024-03-15" }),
    );
    assert_eq!(overview.get("daysTracked").and_then(|v| v.as_u64()), Some(0));
}

#[test]
fn set_record_rejects_unknown_student_and_bad_params() {
    let workspace = temp_dir("attendance-set-validation");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "roster.add",
        json!({ "name": "Ana", "id": "a" }),
    );

    let unknown = request(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.setRecord",
        json!({ "date": "2024-03-15", "studentId": "ghost", "status": "present" }),
    );
    assert_eq!(
        unknown
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );

    let bad_date = request(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.setRecord",
        json!({ "date": "March 15", "studentId": "a", "status": "present" }),
    );
    assert_eq!(
        bad_date
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );

    let bad_status = request(
        &mut stdin,
        &mut reader,
        "5",
        "attendance.setRecord",
        json!({ "date": "2024-03-15", "studentId": "a", "status": "tardy" }),
    );
    assert_eq!(
        bad_status
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );
}
