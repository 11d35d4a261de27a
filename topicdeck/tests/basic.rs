use std::process::Command;

#[test]
fn types_lists_builtin_messages() {
    let exe = env!("CARGO_BIN_EXE_topicdeck");
    let output = Command::new(exe).arg("types").output().expect("run types");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("geometry_msgs/Twist"));
    assert!(stdout.contains("std_msgs/String"));
    assert!(stdout.contains("linear: geometry_msgs/Vector3"));
}

#[test]
fn types_includes_schemas_from_directory() {
    let exe = env!("CARGO_BIN_EXE_topicdeck");
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("my_msgs.toml"),
        r#"
[[types]]
name = "my_msgs/Gauge"

[types.fields]
level = "float64"
label = "string"
"#,
    )
    .expect("write schema file");

    let output = Command::new(exe)
        .args(["--schemas", dir.path().to_string_lossy().as_ref(), "types"])
        .output()
        .expect("run types with schema dir");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("my_msgs/Gauge"));
    assert!(stdout.contains("level: float64"));
}

#[test]
fn bad_schema_directory_fails() {
    let exe = env!("CARGO_BIN_EXE_topicdeck");
    let output = Command::new(exe)
        .args(["--schemas", "/nonexistent/schemas", "types"])
        .output()
        .expect("run types with bad dir");
    assert!(!output.status.success());
}

#[cfg(unix)]
mod with_stub_player {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::process::Command;

    fn write_stub(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("stub-player");
        std::fs::write(&path, body).expect("write stub");
        let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod stub");
        path
    }

    const INFO_STUB: &str = r#"#!/bin/sh
if [ "$1" = "info" ]; then
cat <<'EOF'
path: /data/run.bag
duration: 116.0
size: 260571
messages: 116
topics:
    - topic: /chatter
      type: std_msgs/String
      messages: 58
      frequency: 0.5
EOF
fi
"#;

    #[test]
    fn bag_info_prints_summary() {
        let exe = env!("CARGO_BIN_EXE_topicdeck");
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), INFO_STUB);

        let output = Command::new(exe)
            .args([
                "bag-info",
                "--program",
                stub.to_string_lossy().as_ref(),
                "/data/run.bag",
            ])
            .output()
            .expect("run bag-info");
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("duration: 116.0 s"));
        assert!(stdout.contains("messages: 116"));
        assert!(stdout.contains("/chatter  [std_msgs/String]  58 msgs  @ 0.5 Hz"));
    }

    #[test]
    fn bag_info_fails_on_silent_player() {
        let exe = env!("CARGO_BIN_EXE_topicdeck");
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");

        let output = Command::new(exe)
            .args([
                "bag-info",
                "--program",
                stub.to_string_lossy().as_ref(),
                "/data/run.bag",
            ])
            .output()
            .expect("run bag-info");
        assert!(!output.status.success());
    }
}
