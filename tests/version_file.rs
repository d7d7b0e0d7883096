//! Version bumps against a real project config file.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use ue_build_orchestrator::{
    ini::ConfigDocument,
    runner::{
        BuildFlavor, DEFAULT_VERSION_KEY, DEFAULT_VERSION_SECTION, ErrorKind,
        builder::versioning::update_version_file,
    },
};

const FIXTURE: &str = include_str!("fixtures/DefaultGame.ini");

fn april_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn project_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("DefaultGame.ini");
    std::fs::write(&path, contents).unwrap();
    path
}

fn bump(path: &Path, flavor: BuildFlavor) -> String {
    update_version_file(
        path,
        DEFAULT_VERSION_SECTION,
        DEFAULT_VERSION_KEY,
        april_first(),
        flavor,
    )
    .unwrap()
    .to_string()
}

#[test]
fn bump_changes_only_the_version_line() {
    let temp = tempfile::tempdir().unwrap();
    let path = project_config(temp.path(), FIXTURE);

    assert_eq!(bump(&path, BuildFlavor::Development), "040125_dev_004");

    let written = std::fs::read_to_string(&path).unwrap();
    let expected = FIXTURE.replace(
        "ProjectVersion=040125_dev_003",
        "ProjectVersion=040125_dev_004",
    );
    assert_eq!(written, expected);
}

#[test]
fn crlf_files_keep_their_line_endings() {
    let temp = tempfile::tempdir().unwrap();
    let crlf = FIXTURE.replace('\n', "\r\n");
    let path = project_config(temp.path(), &crlf);

    bump(&path, BuildFlavor::Development);

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        crlf.replace("040125_dev_003", "040125_dev_004")
    );
}

#[test]
fn byte_order_mark_is_kept_with_the_first_section() {
    let temp = tempfile::tempdir().unwrap();
    let with_bom = format!("\u{feff}{FIXTURE}");
    let path = project_config(temp.path(), &with_bom);

    assert_eq!(bump(&path, BuildFlavor::Development), "040125_dev_004");

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        with_bom.replace(
            "ProjectVersion=040125_dev_003",
            "ProjectVersion=040125_dev_004",
        )
    );
}

#[test]
fn missing_entry_is_appended_to_existing_section() {
    let temp = tempfile::tempdir().unwrap();
    let path = project_config(
        temp.path(),
        "[/Script/EngineSettings.GeneralProjectSettings]\nProjectID=ABC\nProjectName=MyGame\n\n[Other]\nKey=Value\n\n",
    );

    assert_eq!(bump(&path, BuildFlavor::Shipping), "040125_shipping_001");

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[/Script/EngineSettings.GeneralProjectSettings]\nProjectID=ABC\nProjectName=MyGame\nProjectVersion=040125_shipping_001\n\n[Other]\nKey=Value\n\n"
    );
}

#[test]
fn missing_section_is_created_at_the_end() {
    let temp = tempfile::tempdir().unwrap();
    let path = project_config(temp.path(), "[Other]\nKey=Value\n\n");

    assert_eq!(bump(&path, BuildFlavor::DebugGame), "040125_debug_001");

    let doc = ConfigDocument::parse(&path).unwrap();
    let names: Vec<&str> = doc.sections().iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        ["[Other]", "[/Script/EngineSettings.GeneralProjectSettings]"]
    );
}

#[test]
fn repeated_bumps_count_up() {
    let temp = tempfile::tempdir().unwrap();
    let path = project_config(temp.path(), FIXTURE);

    let tokens: Vec<String> = (0..3)
        .map(|_| bump(&path, BuildFlavor::Development))
        .collect();
    assert_eq!(tokens, ["040125_dev_004", "040125_dev_005", "040125_dev_006"]);
}

#[test]
fn missing_file_is_config_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let err = update_version_file(
        &temp.path().join("DefaultGame.ini"),
        DEFAULT_VERSION_SECTION,
        DEFAULT_VERSION_KEY,
        april_first(),
        BuildFlavor::Development,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
    assert!(!temp.path().join("DefaultGame.ini").exists());
}
