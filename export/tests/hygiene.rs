//! Hygiene: source-level budgets for the export crate.
//!
//! Every non-test `.rs` file under `src/` is scanned line by line. Panicking
//! calls, discarded errors and stray printing all have a budget of zero;
//! compile never fails, so there is nothing to panic about.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern and how many lines may contain it.
struct Budget {
    pattern: &'static str,
    max: usize,
    hint: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, hint: "propagate with `?` or match" },
    Budget { pattern: ".expect(", max: 0, hint: "propagate with `?` or match" },
    Budget { pattern: "panic!(", max: 0, hint: "fall back to a default" },
    Budget { pattern: "unreachable!(", max: 0, hint: "make the state unrepresentable" },
    Budget { pattern: "todo!(", max: 0, hint: "finish the stub" },
    Budget { pattern: "unimplemented!(", max: 0, hint: "finish the stub" },
    Budget { pattern: "let _ =", max: 0, hint: "inspect the result" },
    Budget { pattern: ".ok()", max: 0, hint: "inspect the error" },
    Budget { pattern: "Err(_) => None", max: 0, hint: "log or propagate the error" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, hint: "delete the code" },
    Budget { pattern: "println!(", max: 0, hint: "use tracing" },
    Budget { pattern: "dbg!(", max: 0, hint: "use tracing" },
];

fn production_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            out.push(path);
        }
    }
}

/// Lines matching `pattern`, as `path:line` strings.
fn offenders(files: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(move |(n, _)| format!("  {}:{}", path.display(), n + 1))
        })
        .collect()
}

fn load_sources() -> Vec<(PathBuf, String)> {
    let mut paths = Vec::new();
    production_files(Path::new("src"), &mut paths);
    paths
        .into_iter()
        .map(|p| {
            let content = fs::read_to_string(&p).unwrap_or_else(|e| panic!("read {}: {e}", p.display()));
            (p, content)
        })
        .collect()
}

#[test]
fn sources_are_found() {
    assert!(!load_sources().is_empty(), "no sources under src/; run from the crate root");
}

#[test]
fn budgets_hold() {
    let files = load_sources();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let hits = offenders(&files, budget.pattern);
        if hits.len() > budget.max {
            failures.push(format!(
                "`{}` found {} times, max {} ({}):\n{}",
                budget.pattern,
                hits.len(),
                budget.max,
                budget.hint,
                hits.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
