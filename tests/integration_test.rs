use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::channel;

use disc_dumper_gui::core::{
    assemble, gather_image_info, load_profiles, load_settings, zip_logs, AssembleError,
    DumpRequest, SpeedSelection,
};
use tempfile::TempDir;

// --- Helper: write a file under the temp dump directory ---
fn write_file(dir: &Path, name: &str, content: &str) {
    let mut file = File::create(dir.join(name)).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

// --- Helper: settings + profiles files like the app ships them ---
fn write_config(dir: &Path, exe: &Path) {
    write_file(
        dir,
        "settings.json",
        &format!(
            r#"{{
                "dic_path": {:?},
                "c2_rereads": 4000
            }}"#,
            exe.to_string_lossy()
        ),
    );
    write_file(
        dir,
        "disc_profiles.json",
        r#"{
            "PSX": {"disc_type": "cd", "c2": "/c2", "nl": "/nl"},
            "Audio CD": {"disc_type": "cd"}
        }"#,
    );
}

#[test]
fn test_end_to_end_dump_pipeline() {
    // 1. Setup: a fake executable, config files and an output directory
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("dumps");
    std::fs::create_dir(&out_dir).unwrap();

    let exe = temp_dir.path().join("DiscImageCreator.exe");
    write_file(temp_dir.path(), "DiscImageCreator.exe", "stub");
    write_config(temp_dir.path(), &exe);

    let settings = load_settings(&temp_dir.path().join("settings.json")).unwrap();
    let profiles = load_profiles(&temp_dir.path().join("disc_profiles.json")).unwrap();
    assert_eq!(settings.c2_rereads, Some(4000));

    // 2. Assemble the command the Start button would launch
    let request = DumpRequest {
        disc_type: "PSX".to_string(),
        drive: Some("/dev/sr0".to_string()),
        file_name: "game".to_string(),
        directory: out_dir.to_string_lossy().to_string(),
        speed: SpeedSelection::Fixed(4),
        zip_logs: true,
    };

    let cmd = assemble(&request, &settings, &profiles).unwrap();
    assert_eq!(cmd[1], "cd");
    assert_eq!(cmd[2], "/dev/sr0");
    assert!(cmd[3].ends_with("game.bin"));
    assert_eq!(cmd[4], "4");
    assert!(cmd.contains(&"/c2 4000".to_string()));
    assert!(cmd.contains(&"/nl".to_string()));
    assert!(cmd.contains(&"/q".to_string()));

    // 3. Pretend the tool ran and left its sidecar files behind
    write_file(&out_dir, "game.cue", "FILE \"game.bin\" BINARY\n  TRACK 01 MODE2/2352\n");
    write_file(&out_dir, "game.dat", "<rom name=\"game.bin\"/>\n");

    let mut disc_txt = String::from("========== Offset ==========\n");
    disc_txt.push_str("\tCD Offset(Byte) 112, (Samples) 28\n");
    write_file(&out_dir, "game_disc.txt", &disc_txt);

    let mut main_info = String::new();
    for i in 0..52 {
        main_info.push_str(&format!("header {}\n", i));
    }
    main_info.push_str("VolumeIdentifier: GAME\n");
    for i in 0..5 {
        main_info.push_str(&format!("descriptor {}\n", i));
    }
    main_info.push_str("past the excerpt\n");
    write_file(&out_dir, "game_mainInfo.txt", &main_info);

    // 4. Collect image info
    let info = gather_image_info(&out_dir, "game.bin");
    assert!(info.cue.unwrap().contains("TRACK 01"));
    assert!(info.dat.unwrap().contains("rom name"));
    assert_eq!(info.write_offset, Some(28));
    let pvd = info.pvd.unwrap();
    assert!(pvd.starts_with("VolumeIdentifier: GAME\n"));
    assert!(!pvd.contains("past the excerpt"));

    // 5. Zip the logs
    let archive = zip_logs(&out_dir).unwrap();
    let zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut names: Vec<_> = zip.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(
        names,
        ["game.cue", "game.dat", "game_disc.txt", "game_mainInfo.txt"]
    );
}

#[test]
fn test_validation_failures_surface_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let exe = temp_dir.path().join("DiscImageCreator.exe");
    write_file(temp_dir.path(), "DiscImageCreator.exe", "stub");
    write_config(temp_dir.path(), &exe);

    let settings = load_settings(&temp_dir.path().join("settings.json")).unwrap();
    let profiles = load_profiles(&temp_dir.path().join("disc_profiles.json")).unwrap();

    let valid = DumpRequest {
        disc_type: "Audio CD".to_string(),
        drive: Some("/dev/sr0".to_string()),
        file_name: "dump".to_string(),
        directory: temp_dir.path().to_string_lossy().to_string(),
        speed: SpeedSelection::Fixed(8),
        zip_logs: false,
    };
    assert!(assemble(&valid, &settings, &profiles).is_ok());

    let mut bad_profile = valid.clone();
    bad_profile.disc_type = "MiniDisc".to_string();
    assert!(matches!(
        assemble(&bad_profile, &settings, &profiles),
        Err(AssembleError::UnknownProfile(_))
    ));

    let mut bad_dir = valid.clone();
    bad_dir.directory = "/no/such/directory".to_string();
    assert_eq!(
        assemble(&bad_dir, &settings, &profiles),
        Err(AssembleError::BadDirectory)
    );

    let mut bad_speed = valid.clone();
    bad_speed.speed = SpeedSelection::Custom("max".to_string());
    assert_eq!(
        assemble(&bad_speed, &settings, &profiles),
        Err(AssembleError::BadSpeed)
    );

    let mut no_drive = valid;
    no_drive.drive = None;
    assert_eq!(
        assemble(&no_drive, &settings, &profiles),
        Err(AssembleError::NoDrive)
    );
}

// The runner against a real child process: printf emits a progress line
// redrawn with bare CRs followed by a CRLF-terminated final line.
#[cfg(unix)]
#[test]
fn test_runner_streams_real_child_output() {
    use disc_dumper_gui::core::{spawn_dump, ConsoleEvent};

    let cmd = vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        "printf 'hello\\r\\nread 10%%\\rread 50%%\\rread 100%%\\r\\ndone\\r\\n'".to_string(),
    ];

    let (tx, rx) = channel();
    spawn_dump(&cmd, tx).unwrap();

    let mut events = Vec::new();
    loop {
        let event = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("runner stalled");
        let finished = matches!(event, ConsoleEvent::Finished(_));
        events.push(event);
        if finished {
            break;
        }
    }

    assert_eq!(events.last(), Some(&ConsoleEvent::Finished(Some(0))));
    assert!(events.contains(&ConsoleEvent::Line("hello".to_string())));
    assert!(events.contains(&ConsoleEvent::Progress("read 10%".to_string())));
    assert!(events.contains(&ConsoleEvent::Progress("read 50%".to_string())));
    assert!(events.contains(&ConsoleEvent::Line("read 100%".to_string())));
    assert!(events.contains(&ConsoleEvent::Line("done".to_string())));
}

#[cfg(unix)]
#[test]
fn test_runner_reports_nonzero_exit() {
    use disc_dumper_gui::core::{spawn_dump, ConsoleEvent};

    let cmd = vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        "printf 'something went wrong\\r\\n'; exit 3".to_string(),
    ];

    let (tx, rx) = channel();
    spawn_dump(&cmd, tx).unwrap();

    let mut last = None;
    while let Ok(event) = rx.recv_timeout(std::time::Duration::from_secs(10)) {
        let finished = matches!(event, ConsoleEvent::Finished(_));
        last = Some(event);
        if finished {
            break;
        }
    }

    assert_eq!(last, Some(ConsoleEvent::Finished(Some(3))));
}
