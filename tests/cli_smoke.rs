mod common;

use std::path::PathBuf;

use clockreel::GlyphKey;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_clockreel")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "clockreel.exe"
            } else {
                "clockreel"
            });
            p
        })
}

#[test]
fn cli_frame_writes_png_of_max_size() {
    let dir = common::scratch_dir("cli_frame");
    let assets = dir.join("Assets");
    std::fs::create_dir_all(&assets).unwrap();
    common::write_assets(&assets, "png", &[]);
    let out_path = dir.join("frame.png");

    let status = std::process::Command::new(exe())
        .arg("--assets")
        .arg(&assets)
        .args(["frame", "--seconds", "3723", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (8, 12));
}

#[test]
fn cli_missing_assets_fails_listing_every_name() {
    let dir = common::scratch_dir("cli_missing");
    let assets = dir.join("Assets");
    std::fs::create_dir_all(&assets).unwrap();
    common::write_assets(&assets, "png", &[GlyphKey::Digit3, GlyphKey::Separator]);

    let output = std::process::Command::new(exe())
        .arg("--assets")
        .arg(&assets)
        .args(["timer", "--hours", "0", "--minutes", "0", "--seconds", "3"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3.png"), "stderr: {stderr}");
    assert!(stderr.contains("colon.png"), "stderr: {stderr}");
}

#[test]
fn cli_double_codec_failure_exits_non_zero() {
    let dir = common::scratch_dir("cli_fatal");
    let assets = dir.join("Assets");
    std::fs::create_dir_all(&assets).unwrap();
    common::write_assets(&assets, "png", &[]);

    let status = std::process::Command::new(exe())
        .arg("--assets")
        .arg(&assets)
        .arg("--out-dir")
        .arg(&dir)
        .args(["--codec", "no-such-codec-a", "--fallback-codec", "no-such-codec-b"])
        .args(["stopwatch", "--hours", "0"])
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn cli_interactive_reports_bad_input_and_exits_on_eof() {
    use std::io::Write as _;

    let dir = common::scratch_dir("cli_interactive");
    let assets = dir.join("Assets");
    std::fs::create_dir_all(&assets).unwrap();
    common::write_assets(&assets, "png", &[]);

    let mut child = std::process::Command::new(exe())
        .arg("--assets")
        .arg(&assets)
        .arg("interactive")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"3\n1\nxyz\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid choice. Please try again."));
    assert!(stdout.contains("Error: invalid numeric input for hours: 'xyz'"));
}
