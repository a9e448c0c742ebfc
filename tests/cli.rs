use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("blockchart").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("render"));
}

#[test]
fn init_config_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.json");
    Command::cargo_bin("blockchart")
        .unwrap()
        .arg("init-config")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote default config"));
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["width"], 800);
    assert_eq!(json["legend_position"], "bottom");
}

#[test]
fn renders_pie_with_image_map() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("share.csv");
    fs::write(&input, "key,value\nApples,3\nPears,1\n").unwrap();
    let out = dir.path().join("share.svg");
    let map = dir.path().join("share.html");
    let entities = dir.path().join("share.json");

    Command::cargo_bin("blockchart")
        .unwrap()
        .args(["render", "--kind", "pie", "--title", "Fruit"])
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--image-map")
        .arg(&map)
        .arg("--entities")
        .arg(&entities)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote chart to"));

    assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
    let html = fs::read_to_string(&map).unwrap();
    assert!(html.contains("<map"));
    assert!(html.contains("Apples: (3, 75%)"));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&entities).unwrap()).unwrap();
    assert!(json.as_array().is_some_and(|a| !a.is_empty()));
}

#[test]
fn renders_line_png_from_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("xy.csv");
    fs::write(&input, "series,x,y\nA,1,2\nA,2,4\nB,1,3\nB,2,1\n").unwrap();
    let config = dir.path().join("cfg.json");
    fs::write(&config, r#"{"width": 320, "height": 200, "legend_position": "right"}"#).unwrap();
    let out = dir.path().join("xy.png");

    Command::cargo_bin("blockchart")
        .unwrap()
        .arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn unknown_legend_edge_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("share.csv");
    fs::write(&input, "key,value\nA,1\n").unwrap();
    Command::cargo_bin("blockchart")
        .unwrap()
        .args(["render", "--kind", "pie", "--legend", "middle"])
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("x.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("middle"));
}

#[test]
fn pdf_output_is_unavailable() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("share.csv");
    fs::write(&input, "key,value\nA,1\n").unwrap();
    let out = dir.path().join("x.pdf");
    Command::cargo_bin("blockchart")
        .unwrap()
        .args(["render", "--kind", "pie"])
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pdf"));
    assert!(!out.exists());
}
