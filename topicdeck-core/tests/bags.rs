use topicdeck_core::{BagError, BagOptions, BagPlayer};

#[test]
fn default_options_map_to_queue_and_rate() {
    let options = BagOptions::default();
    assert_eq!(options.to_args(), vec!["--queue=100", "--rate=1"]);
}

#[test]
fn every_option_maps_to_an_argument() {
    let options = BagOptions {
        immediate: true,
        loop_playback: true,
        publish_clock: true,
        clock_hz: Some(200),
        queue_size: 500,
        rate: 2.5,
    };
    assert_eq!(
        options.to_args(),
        vec![
            "--immediate",
            "--loop",
            "--clock",
            "--hz=200",
            "--queue=500",
            "--rate=2.5"
        ]
    );
}

#[test]
fn missing_program_reports_spawn_error() {
    let player = BagPlayer::with_program("/nonexistent/bag-player", "/data/run.bag");
    let err = player.info().unwrap_err();
    assert!(matches!(err, BagError::Spawn { .. }));
}

#[cfg(unix)]
mod with_stub_player {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    /// Writes an executable stand-in for the player binary.
    fn write_stub(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("stub-player");
        std::fs::write(&path, body).expect("write stub");
        let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod stub");
        path
    }

    fn wait_until_stopped(player: &mut BagPlayer, deadline: Duration) -> bool {
        let start = Instant::now();
        while player.is_playing() {
            if start.elapsed() > deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        true
    }

    const INFO_STUB: &str = r#"#!/bin/sh
if [ "$1" = "info" ]; then
cat <<'EOF'
path: /data/run.bag
version: 2.0
duration: 116.0
start: 1479425226.0
end: 1479425342.0
size: 260571
messages: 116
indexed: true
compression: none
topics:
    - topic: /chatter
      type: std_msgs/String
      messages: 58
      frequency: 0.5
    - topic: /imu
      type: sensor_msgs/Imu
      messages: 58
EOF
fi
"#;

    #[test]
    fn info_parses_player_yaml() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), INFO_STUB);
        let player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");

        let info = player.info().expect("parse info");
        assert_eq!(info.path.as_deref(), Some("/data/run.bag"));
        assert_eq!(info.duration, Some(116.0));
        assert_eq!(info.messages, Some(116));
        assert_eq!(info.topics.len(), 2);
        assert_eq!(info.topics[0].topic, "/chatter");
        assert_eq!(info.topics[0].type_name, "std_msgs/String");
        assert_eq!(info.topics[0].frequency, Some(0.5));
        assert_eq!(info.topics[1].messages, Some(58));
        // Keys we do not model are kept verbatim.
        assert!(info.extra.contains_key("compression"));
        assert!(info.extra.contains_key("indexed"));
    }

    #[test]
    fn empty_info_output_is_unreadable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");
        let player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");
        assert!(matches!(player.info(), Err(BagError::Unreadable)));
    }

    #[test]
    fn scalar_info_output_is_unreadable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\necho nope\n");
        let player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");
        assert!(matches!(player.info(), Err(BagError::Unreadable)));
    }

    #[test]
    fn play_then_stop_interrupts_the_player() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nif [ \"$1\" = \"play\" ]; then sleep 30; fi\n");
        let mut player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");

        player.play().expect("spawn player");
        assert!(player.is_playing());
        player.stop();
        assert!(!player.is_playing());
        // A second stop is harmless.
        player.stop();
    }

    #[test]
    fn finished_player_is_detected_and_reaped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");
        let mut player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");

        player.play().expect("spawn player");
        assert!(wait_until_stopped(&mut player, Duration::from_secs(2)));
        // Stopping after natural exit must not fail.
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn stop_tolerates_an_unreaped_zombie() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");
        let mut player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");

        player.play().expect("spawn player");
        // Give it time to exit without reaping it first.
        std::thread::sleep(Duration::from_millis(200));
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn play_while_playing_is_a_no_op() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = write_stub(dir.path(), "#!/bin/sh\nif [ \"$1\" = \"play\" ]; then sleep 30; fi\n");
        let mut player = BagPlayer::with_program(&stub.display().to_string(), "/data/run.bag");

        player.play().expect("spawn player");
        let first = player.is_playing();
        player.play().expect("second play is accepted");
        assert!(first && player.is_playing());
        player.stop();
    }
}
