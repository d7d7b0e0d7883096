//! `ue_build` binary behavior.

use assert_cmd::Command;
use predicates::prelude::*;

fn ue_build(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ue_build").unwrap();
    cmd.current_dir(dir).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn help_shows_usage_and_exits_zero() {
    let temp = tempfile::tempdir().unwrap();
    ue_build(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("BuildCookRun"))
        .stdout(predicate::str::contains("--update-settings-only"));
}

#[test]
fn update_settings_only_writes_json_without_building() {
    let temp = tempfile::tempdir().unwrap();
    ue_build(temp.path())
        .args([
            "--project-name",
            "MyGame",
            "--project-path",
            "/work/MyGame",
            "--build-path",
            "/builds",
            "--build-config",
            "shipping",
            "--update-settings-only",
        ])
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp.path().join("settings.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["projectname"], "MyGame");
    assert_eq!(json["buildconfig"], "Shipping");
    assert_eq!(json["cookcommand"], "BuildCookRun");
    assert_eq!(json["platform"], "Win64");
}

#[test]
fn saved_settings_are_read_back() {
    let temp = tempfile::tempdir().unwrap();
    let settings = temp.path().join("custom.json");
    ue_build(temp.path())
        .args(["--project-name", "First", "--update-settings-only", "--settings-file"])
        .arg(&settings)
        .assert()
        .success();

    ue_build(temp.path())
        .args(["--platform", "Linux", "--update-settings-only", "--settings-file"])
        .arg(&settings)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(json["projectname"], "First");
    assert_eq!(json["platform"], "Linux");
}

#[test]
fn incomplete_settings_exit_one() {
    let temp = tempfile::tempdir().unwrap();
    ue_build(temp.path())
        .args(["--project-name", "MyGame"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid settings"));
}

#[test]
fn persisted_version_bump_can_be_turned_back_on() {
    let temp = tempfile::tempdir().unwrap();
    let read_flag = || {
        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        json["updateversion"].clone()
    };

    ue_build(temp.path())
        .args(["--no-version-bump", "--update-settings-only"])
        .assert()
        .success();
    assert_eq!(read_flag(), false);

    ue_build(temp.path())
        .arg("--update-settings-only")
        .assert()
        .success();
    assert_eq!(read_flag(), false);

    ue_build(temp.path())
        .args(["--version-bump", "--update-settings-only"])
        .assert()
        .success();
    assert_eq!(read_flag(), true);
}

#[test]
fn bad_flag_values_exit_one() {
    let temp = tempfile::tempdir().unwrap();
    ue_build(temp.path())
        .args(["--build-config", "release"])
        .assert()
        .code(1);
    ue_build(temp.path())
        .args(["--timeout-secs", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--timeout-secs"))
        .stderr(predicate::str::contains("--help"));
}

#[test]
fn malformed_settings_file_exits_one() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("settings.json"), "{ nope").unwrap();
    ue_build(temp.path())
        .arg("--update-settings-only")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("settings.json"));
}

#[cfg(unix)]
#[test]
fn full_build_with_fake_packager() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("MyGame/Config");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("DefaultGame.ini"),
        "[/Script/EngineSettings.GeneralProjectSettings]\nProjectName=MyGame\n\n",
    )
    .unwrap();

    let script = temp.path().join("fake_uat.sh");
    std::fs::write(
        &script,
        r#"for arg in "$@"; do
  case "$arg" in
    -archivedirectory=*) out="${arg#-archivedirectory=}" ;;
  esac
done
mkdir -p "$out/Linux"
echo "game" > "$out/Linux/MyGame"
"#,
    )
    .unwrap();

    ue_build(temp.path())
        .arg("--project-name")
        .arg("MyGame")
        .arg("--project-path")
        .arg(temp.path().join("MyGame"))
        .arg("--build-path")
        .arg(temp.path().join("Builds"))
        .args(["--uat-path", "/bin/sh", "--platform", "Linux", "--cook-command"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("SHA256"));

    let ini = std::fs::read_to_string(config.join("DefaultGame.ini")).unwrap();
    let version = ini
        .lines()
        .find_map(|line| line.strip_prefix("ProjectVersion="))
        .unwrap()
        .to_string();
    assert!(version.ends_with("_dev_001"));

    let archive = temp
        .path()
        .join("Builds")
        .join(&version)
        .join(format!("MyGame_{version}_Linux.zip"));
    assert!(archive.is_file());
}
