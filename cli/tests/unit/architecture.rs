//! Structural tests for layer boundary enforcement.
//!
//! These tests scan source files to verify that the domain stays pure and
//! the application layer only talks to the outside world through ports.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with 1-based line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            !in_test && !trimmed.starts_with("//") && !trimmed.starts_with('*')
        })
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

fn scan(layer: &[&str], forbidden: &[&str]) -> Vec<String> {
    let mut dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    for part in layer {
        dir = dir.join(part);
    }

    let mut violations = Vec::new();
    for file in collect_rs_files(&dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for needle in forbidden {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{lineno}: `{needle}`: {}", line.trim()));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_io() {
    let violations = scan(
        &["domain"],
        &[
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "crate::infra",
            "crate::application",
            "crate::output",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_uses_ports_only() {
    let violations = scan(
        &["application"],
        &[
            "crate::infra",
            "crate::output",
            "std::process::Command",
            "tokio::process",
            "std::fs::",
            "ureq::",
            "dialoguer",
        ],
    );
    assert!(
        violations.is_empty(),
        "application/ must reach the outside world through ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_output_or_cli() {
    let violations = scan(&["infra"], &["crate::output", "crate::cli"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from output/ or cli:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = scan(&["infra"], &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "infra/ must not print; report through the ProgressReporter port:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_runner_is_only_constructed_at_the_entry_point() {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut violations = Vec::new();
    for file in collect_rs_files(&src) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string()
            .replace('\\', "/");
        if rel.contains("/infra/") || rel.ends_with("cli.rs") {
            continue;
        }
        for (lineno, line) in production_lines(&file) {
            if line.contains("TokioCommandRunner") {
                violations.push(format!("{rel}:{lineno}: {}", line.trim()));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "TokioCommandRunner used outside infra/ and cli.rs:\n{}",
        violations.join("\n")
    );
}
