// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::{fs, path::Path};

use tag_mapper::{config::MapperConfig, error::InputError, mapper::execute};
use tag_resolution::InstructionKind;
use tempfile::TempDir;

const PROGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RSLogix5000Content><Controller Name="Plant">
<Tags>
  <Tag Name="Y" DataType="INT"><Description>Copied block</Description></Tag>
  <Tag Name="Alarm" DataType="INT"><Comments><Comment Operand="[0].3">Pump trip</Comment></Comments></Tag>
</Tags>
<Programs><Program Name="Main"><Routines>
  <Routine Name="Copy" Type="RLL"><RLLContent>
    <Rung Number="0" Type="N"><Text><![CDATA[XIC(Go)COP(Z[5],Y[0],2);]]></Text></Rung>
    <Rung Number="1" Type="N"><Text><![CDATA[XIC(Trip)OTE(Alarm[0].3);]]></Text></Rung>
  </RLLContent></Routine>
</Routines></Program></Programs>
</Controller></RSLogix5000Content>"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture written");
    path
}

fn config_for(dir: &TempDir) -> MapperConfig {
    MapperConfig {
        output_path: dir.path().join("mapping.csv").to_string_lossy().to_string(),
        ..MapperConfig::default()
    }
}

fn output(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("mapping.csv")).expect("output written")
}

#[test]
fn headered_tag_list_to_mapping_table() {
    let dir = TempDir::new().expect("temp dir");
    let tags = write(&dir, "tags.csv", "Name,Col45\nlevel,Y[0]\nlevel2,Y[1]\nalarm,Alarm[0]\nflag,Flag\n");
    let program = write(&dir, "plant.L5X", PROGRAM);

    let summary = execute(&tags, &program, &config_for(&dir)).expect("run succeeds");
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.salvage_warnings, 0);
    assert_eq!(summary.counts.get(&InstructionKind::NotFound), Some(&1));

    insta::assert_snapshot!(output(&dir), @r###"
    Col45,Description,DataType,Program,Routine,Rung,Instruction,Source
    Alarm[0].3,Pump trip,INT,Main,Copy,1,OTE,
    Flag,,,,,,Not Found,
    Y[0],Copied block,INT,Main,Copy,0,COP,Z[5]
    Y[1],Copied block,INT,Main,Copy,0,COP,Z[6]
    "###);
}

#[test]
fn raw_export_filtered_by_topic() {
    let dir = TempDir::new().expect("temp dir");
    let tags = write(
        &dir,
        "export.csv",
        ":IOInt,Group,Tag\nlevel,Main,Y[1]\nother,Aux,Y[0]\n",
    );
    let program = write(&dir, "plant.L5X", PROGRAM);
    let config = MapperConfig {
        tag_column: "Col3".to_string(),
        topic: Some("Main".to_string()),
        ..config_for(&dir)
    };

    execute(&tags, &program, &config).expect("run succeeds");
    insta::assert_snapshot!(output(&dir), @r###"
    Col3,Description,DataType,Program,Routine,Rung,Instruction,Source
    Y[1],Copied block,INT,Main,Copy,0,COP,Z[6]
    "###);
}

#[test]
fn truncated_export_is_still_mapped() {
    let dir = TempDir::new().expect("temp dir");
    let tags = write(&dir, "tags.csv", "Col45\nY[0]\n");
    let cut = &PROGRAM[..PROGRAM.find("<Rung Number=\"1\"").expect("second rung")];
    let program = write(&dir, "plant.L5X", cut);

    let summary = execute(&tags, &program, &config_for(&dir)).expect("run succeeds");
    assert!(summary.salvage_warnings > 0);
    assert!(output(&dir).contains("Y[0],Copied block,INT,Main,Copy,0,COP,Z[5]"));
}

#[test]
fn missing_tag_list_fails_before_writing() {
    let dir = TempDir::new().expect("temp dir");
    let program = write(&dir, "plant.L5X", PROGRAM);
    let tags = dir.path().join("absent.csv");

    let err = execute(&tags, &program, &config_for(&dir)).unwrap_err();
    match err.downcast_ref::<InputError>() {
        Some(InputError::NotFound { label, path }) => {
            assert_eq!(*label, "Tag list");
            assert_eq!(path, &tags);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!dir.path().join("mapping.csv").exists());
}

#[test]
fn program_path_must_be_a_file() {
    let dir = TempDir::new().expect("temp dir");
    let tags = write(&dir, "tags.csv", "Col45\nY[0]\n");

    let err = execute(&tags, dir.path(), &config_for(&dir)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::NotAFile { label: "L5X", .. })
    ));
}

#[test]
fn missing_column_names_the_available_ones() {
    let dir = TempDir::new().expect("temp dir");
    let tags = write(&dir, "tags.csv", "Name,Tag\nlevel,Y[0]\n");
    let program = write(&dir, "plant.L5X", PROGRAM);

    let err = execute(&tags, &program, &config_for(&dir)).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"column 'Col45' not found. Available: ["Name", "Tag"]"#
    );
    assert!(!Path::new(&config_for(&dir).output_path).exists());
}
