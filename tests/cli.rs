use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use cmi5_tools::ToolError;
use cmi5_tools::compile::ArchiveMode;
use cmi5_tools::config::{ArchiveModeKind, ArchiverKind, CollisionKind, CompileArgs, CompileConfig};
use cmi5_tools::io::package_write::CollisionPolicy;

#[test]
fn help_lists_every_declared_option() {
    let error = CompileArgs::try_parse_from(["cmi5-tools", "--help"]).expect_err("help shown");
    assert_eq!(error.kind(), ErrorKind::DisplayHelp);

    let help = error.render().to_string();
    for expected in [
        "CMI5 Generator",
        "Compile CMI5 packages for each row in a CSV based on a template.",
        "-h, --help",
        "-t, --template <TEMPLATE>",
        "File containing a mustache template",
        "-s, --source <SOURCE>",
        "-o, --output <OUTPUT>",
        "--package-name-column <PACKAGE_NAME_COLUMN>",
        "Column to use as the name of the package",
        "--archive-mode <ARCHIVE_MODE>",
        "--archiver <ARCHIVER>",
        "--on-collision <ON_COLLISION>",
    ] {
        assert!(help.contains(expected), "help is missing {expected:?}:\n{help}");
    }
}

#[test]
fn short_help_flag_is_accepted() {
    let error = CompileArgs::try_parse_from(["cmi5-tools", "-h"]).expect_err("help shown");
    assert_eq!(error.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn flags_populate_the_config() {
    let args = CompileArgs::try_parse_from([
        "cmi5-tools",
        "-t",
        "course.xml.mustache",
        "--source",
        "courses.csv",
        "-o",
        "dist",
        "--package-name-column",
        "Title",
        "--archive-mode",
        "batch",
        "--archiver",
        "native",
        "--on-collision",
        "overwrite",
    ])
    .expect("arguments parsed");

    assert_eq!(args.archiver, ArchiverKind::Native);
    let config = CompileConfig::from(&args);
    assert_eq!(
        config,
        CompileConfig {
            template: Some(PathBuf::from("course.xml.mustache")),
            source: Some(PathBuf::from("courses.csv")),
            output: Some(PathBuf::from("dist")),
            package_name_column: Some("Title".to_string()),
            archive_mode: ArchiveMode::Batch,
            on_collision: CollisionPolicy::Overwrite,
        }
    );
}

#[test]
fn omitted_flags_use_defaults_and_stay_unset() {
    let args = CompileArgs::try_parse_from(["cmi5-tools"]).expect("arguments parsed");
    assert_eq!(args.archive_mode, ArchiveModeKind::Inline);
    assert_eq!(args.archiver, ArchiverKind::ZipCommand);
    assert_eq!(args.on_collision, CollisionKind::Error);

    let config = CompileConfig::from(&args);
    assert!(matches!(
        config.output_path(),
        Err(ToolError::MissingOption("output"))
    ));
    assert_eq!(config.package_name_column, None);
}

#[test]
fn unknown_archive_mode_is_a_usage_error() {
    let error = CompileArgs::try_parse_from(["cmi5-tools", "--archive-mode", "later"])
        .expect_err("value rejected");
    assert_eq!(error.kind(), ErrorKind::InvalidValue);
}
