//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! `domain` is pure, `application` talks to the runtime only through ports,
//! and `infra` never renders output.

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

fn src_dir(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

fn relative(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .display()
        .to_string()
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

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
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

/// Non-comment production lines of every file under `dir`, with their
/// 1-based line numbers.
fn production_lines(dir: &Path) -> Vec<(String, usize, String)> {
    let mut out = Vec::new();
    for file in collect_rs_files(dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let rel = relative(&file);
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") || trimmed.starts_with("/*") {
                continue;
            }
            out.push((rel.clone(), i + 1, line.to_string()));
        }
    }
    out
}

fn forbidden(dir: &Path, patterns: &[&str]) -> Vec<String> {
    production_lines(dir)
        .into_iter()
        .filter_map(|(rel, lineno, line)| {
            patterns
                .iter()
                .find(|p| line.contains(*p))
                .map(|p| format!("{rel}:{lineno}: `{p}`: {line}"))
        })
        .collect()
}

// ── Layer imports ─────────────────────────────────────────────────────────────

#[test]
fn domain_is_pure() {
    let violations = forbidden(
        &src_dir("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::output",
            "crate::commands",
            "tokio",
            "std::process",
            "std::fs",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must not do I/O or depend on outer layers:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_has_no_outer_layer_imports() {
    let violations = forbidden(
        &src_dir("application"),
        &["crate::infra", "crate::output", "crate::commands", "crate::app::"],
    );
    assert!(
        violations.is_empty(),
        "application/ must reach the runtime through ports only:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_never_spawns_processes() {
    let violations = forbidden(
        &src_dir("application"),
        &["tokio::process", "std::process::Command"],
    );
    assert!(
        violations.is_empty(),
        "application/ must not spawn processes directly:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = forbidden(&src_dir("infra"), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = forbidden(&src_dir("infra"), &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

// ── Trait bounds over concrete types ──────────────────────────────────────────

#[test]
fn no_concrete_provisioner_types_in_service_signatures() {
    let concrete_types = ["LxcProvisioner", "TokioCommandRunner", "DialoguerPrompter"];
    let violations: Vec<String> = production_lines(&src_dir("application"))
        .into_iter()
        .filter(|(_, _, line)| line.contains("fn ") || line.contains("impl"))
        .filter_map(|(rel, lineno, line)| {
            concrete_types
                .iter()
                .find(|t| line.contains(*t))
                .map(|t| format!("{rel}:{lineno}: concrete type `{t}`: {line}"))
        })
        .collect();
    assert!(
        violations.is_empty(),
        "Found concrete adapter types in service signatures, use trait bounds instead:\n{}",
        violations.join("\n")
    );
}

// ── Command handlers ──────────────────────────────────────────────────────────

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if content.contains("pub async fn run(") && !content.contains("app: &AppContext") {
            violations.push(relative(&file));
        }
    }
    assert!(
        violations.is_empty(),
        "Command handlers must accept &AppContext:\n{}",
        violations.join("\n")
    );
}

#[test]
fn commands_never_invoke_the_runtime_binary() {
    let violations = forbidden(
        &src_dir("commands"),
        &["tokio::process", "std::process::Command", "TokioCommandRunner"],
    );
    assert!(
        violations.is_empty(),
        "commands/ must go through application services:\n{}",
        violations.join("\n")
    );
}
