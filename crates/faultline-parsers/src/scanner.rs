//! Project scanner: classifies a project root and enumerates its source
//! tree when no traceback frames are available to drive investigation
//! directly.

use std::path::{Path, PathBuf};

use faultline_core::config::SizeCaps;
use faultline_core::types::{ProjectDescriptor, ProjectType};

use crate::walker;

/// Scans `root`, classifying the project and enumerating its source files
/// up to the caps in `caps`. Files beyond `max_repo_files` or the point at
/// which cumulative size would exceed `max_repo_bytes` are dropped silently
/// from `source_files`, but scanning itself always completes.
pub fn scan_project(root: &Path, caps: &SizeCaps) -> ProjectDescriptor {
    let project_type = classify(root);
    let frameworks = detect_frameworks(root, project_type);
    let entry_points = detect_entry_points(root, project_type);

    let mut source_files = Vec::new();
    let mut total_bytes: u64 = 0;
    for entry in walker::walk(root) {
        if source_files.len() >= caps.max_repo_files {
            break;
        }
        let size = std::fs::metadata(&entry.path).map(|m| m.len()).unwrap_or(0);
        if total_bytes + size > caps.max_repo_bytes as u64 {
            break;
        }
        total_bytes += size;
        source_files.push(entry.path);
    }

    ProjectDescriptor {
        root: root.to_path_buf(),
        project_type,
        frameworks,
        entry_points,
        source_files,
    }
}

fn classify(root: &Path) -> ProjectType {
    if root.join("Cargo.toml").is_file() {
        ProjectType::Rust
    } else if root.join("go.mod").is_file() {
        ProjectType::Go
    } else if root.join("package.json").is_file() {
        ProjectType::Node
    } else if root.join("pom.xml").is_file() || root.join("build.gradle").is_file() {
        ProjectType::Java
    } else if ["pyproject.toml", "requirements.txt", "setup.py"]
        .iter()
        .any(|f| root.join(f).is_file())
    {
        ProjectType::Python
    } else {
        ProjectType::Unknown
    }
}

fn detect_entry_points(root: &Path, project_type: ProjectType) -> Vec<PathBuf> {
    let candidates: &[&str] = match project_type {
        ProjectType::Python => &["main.py", "app.py", "manage.py", "__main__.py"],
        ProjectType::Node => &["index.js", "index.ts", "server.js", "src/index.ts", "src/index.js"],
        ProjectType::Go => &["main.go", "cmd/main.go"],
        ProjectType::Rust => &["src/main.rs"],
        ProjectType::Java => &["src/main/java/Main.java"],
        ProjectType::Unknown => &[],
    };
    candidates
        .iter()
        .map(|c| root.join(c))
        .filter(|p| p.is_file())
        .collect()
}

fn detect_frameworks(root: &Path, project_type: ProjectType) -> Vec<String> {
    let markers: &[(&str, &str)] = match project_type {
        ProjectType::Python => &[
            ("django", "Django"),
            ("flask", "Flask"),
            ("fastapi", "FastAPI"),
        ],
        ProjectType::Node => &[
            ("express", "Express"),
            ("next", "Next.js"),
            ("react", "React"),
            ("nestjs", "NestJS"),
        ],
        ProjectType::Rust => &[
            ("axum", "Axum"),
            ("actix-web", "Actix Web"),
            ("rocket", "Rocket"),
        ],
        ProjectType::Go => &[("gin-gonic", "Gin"), ("echo", "Echo")],
        ProjectType::Java => &[("spring-boot", "Spring Boot")],
        ProjectType::Unknown => &[],
    };

    let manifest_path = match project_type {
        ProjectType::Python => root.join("requirements.txt"),
        ProjectType::Node => root.join("package.json"),
        ProjectType::Rust => root.join("Cargo.toml"),
        ProjectType::Go => root.join("go.mod"),
        ProjectType::Java => root.join("pom.xml"),
        ProjectType::Unknown => return Vec::new(),
    };

    let Ok(contents) = std::fs::read_to_string(&manifest_path) else {
        return Vec::new();
    };
    let lowered = contents.to_lowercase();
    markers
        .iter()
        .filter(|(needle, _)| lowered.contains(needle))
        .map(|(_, label)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_python_project_and_finds_entry_point() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("requirements.txt"), "flask==3.0\n").unwrap();
        fs::write(root.join("app.py"), "").unwrap();

        let descriptor = scan_project(root, &SizeCaps::default());
        assert_eq!(descriptor.project_type, ProjectType::Python);
        assert!(descriptor.frameworks.contains(&"Flask".to_string()));
        assert!(descriptor.entry_points.iter().any(|p| p.ends_with("app.py")));
    }

    #[test]
    fn unknown_project_type_when_no_marker_file_present() {
        let dir = tempdir().unwrap();
        let descriptor = scan_project(dir.path(), &SizeCaps::default());
        assert_eq!(descriptor.project_type, ProjectType::Unknown);
        assert!(descriptor.frameworks.is_empty());
    }

    #[test]
    fn source_file_enumeration_stops_at_max_repo_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"x\"\n").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        for i in 0..10 {
            fs::write(root.join(format!("src/m{i}.rs")), "").unwrap();
        }

        let mut caps = SizeCaps::default();
        caps.max_repo_files = 3;
        let descriptor = scan_project(root, &caps);
        assert_eq!(descriptor.source_files.len(), 3);
    }
}
