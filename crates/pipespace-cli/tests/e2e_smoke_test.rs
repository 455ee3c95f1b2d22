use std::{fs, path::PathBuf};

use tempfile::tempdir;

use pipespace_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_session_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Sessions live at the workspace root, not in the crate
fn sessions_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("sessions")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        svg: None,
        report: false,
        gap: None,
        mode: None,
        save_session: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_sessions() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_sessions = collect_session_files(sessions_dir());
    assert!(
        !valid_sessions.is_empty(),
        "No valid sessions found in sessions/"
    );

    let mut failed_sessions = Vec::new();

    for session_path in &valid_sessions {
        let stem = session_path.file_stem().unwrap().to_string_lossy().to_string();
        let output_path = temp_dir.path().join(format!("{stem}.dxf"));
        let svg_path = temp_dir.path().join(format!("{stem}.svg"));
        let saved_path = temp_dir.path().join(format!("{stem}.saved.json"));

        let mut args = args_for(session_path, output_path.clone());
        args.svg = Some(svg_path.to_string_lossy().to_string());
        args.save_session = Some(saved_path.to_string_lossy().to_string());

        match run(&args) {
            Ok(()) => {
                let dxf = fs::read_to_string(&output_path).expect("DXF should be written");
                assert!(dxf.ends_with("0\nEOF\n"), "{} is truncated", output_path.display());
                assert!(svg_path.exists(), "SVG preview should be written");

                // The saved session must load and export again
                let mut again = args_for(&saved_path, temp_dir.path().join(format!("{stem}.again.dxf")));
                again.log_level = "off".to_string();
                if let Err(e) = run(&again) {
                    failed_sessions.push((saved_path.clone(), e));
                }
            }
            Err(e) => failed_sessions.push((session_path.clone(), e)),
        }
    }

    if !failed_sessions.is_empty() {
        eprintln!("\nValid sessions that failed:");
        for (path, err) in &failed_sessions {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!(
            "{} valid session(s) failed unexpectedly",
            failed_sessions.len()
        );
    }

    println!("✅ All {} valid sessions passed", valid_sessions.len());
}

#[test]
fn e2e_smoke_test_error_sessions() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_sessions = collect_session_files(sessions_dir().join("errors"));
    assert!(
        !error_sessions.is_empty(),
        "No error sessions found in sessions/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();
    let mut left_output = Vec::new();

    for session_path in &error_sessions {
        let stem = session_path.file_stem().unwrap().to_string_lossy().to_string();
        let output_path = temp_dir.path().join(format!("error_{stem}.dxf"));
        let svg_path = temp_dir.path().join(format!("error_{stem}.svg"));

        let mut args = args_for(session_path, output_path.clone());
        args.svg = Some(svg_path.to_string_lossy().to_string());

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(session_path.clone());
        }
        if output_path.exists() || svg_path.exists() {
            left_output.push(session_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError sessions that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error session(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    assert!(
        left_output.is_empty(),
        "Failed sessions must not write output files: {left_output:?}"
    );

    println!(
        "✅ All {} error sessions failed as expected",
        error_sessions.len()
    );
}

#[test]
fn e2e_overrides_change_the_drawing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let session_path = temp_dir.path().join("rack.json");
    fs::write(
        &session_path,
        r#"{
            "metadata": { "version": "1.0", "gap": "25", "mode": "pp" },
            "pipes": [
                { "name": "A", "size": "6", "cls": "150" },
                { "name": "B", "size": "6", "cls": "150" }
            ]
        }"#,
    )
    .unwrap();

    let output_path = temp_dir.path().join("rack.dxf");
    let mut args = args_for(&session_path, output_path.clone());
    args.gap = Some(50.0);
    args.mode = Some(pipespace::pipe::ClearanceMode::PipeToFlange);

    run(&args).expect("Override run should succeed");

    let dxf = fs::read_to_string(&output_path).unwrap();
    // Class 150 NPS 6 flange is 279 mm: 84.15 + 139.5 + 50 = 273.65, rounded to 275.
    assert!(dxf.contains("10\n359.150\n"), "Second pipe should sit at 84.15 + 275");
    assert!(dxf.contains("8\nFLANGE\n"));
}
