//! Workflow definition loader
//!
//! Load workflow YAML files from a file or a directory.

use std::path::Path;

use super::Workflow;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Invalid workflow in {file}: {reason}")]
    Invalid { file: String, reason: String },
}

pub struct WorkflowLoader;

impl WorkflowLoader {
    /// Load every `*.yaml` / `*.yml` workflow in a directory, sorted by file name
    pub fn load_directory(dir: &Path) -> Result<Vec<Workflow>, LoadError> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            // engine.yaml configures the engine, it is not a workflow
            if filename == "engine.yaml" || filename == "engine.yml" {
                continue;
            }

            if ext == Some("yaml") || ext == Some("yml") {
                paths.push(path);
            }
        }

        paths.sort();
        paths.iter().map(|p| Self::load_file(p)).collect()
    }

    pub fn load_file(path: &Path) -> Result<Workflow, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate a workflow definition; `source` names it in errors
    pub fn parse(content: &str, source: &str) -> Result<Workflow, LoadError> {
        let workflow: Workflow = serde_yaml::from_str(content).map_err(|e| LoadError::Yaml {
            file: source.to_string(),
            error: e,
        })?;
        workflow.validate().map_err(|reason| LoadError::Invalid {
            file: source.to_string(),
            reason,
        })?;
        Ok(workflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_directory() {
        let dir = tempdir().unwrap();

        fs::write(
            dir.path().join("welcome.yaml"),
            r#"
id: welcome-clinic
trigger: ClinicCreated
actions:
  - id: notify
    type: create_notification
    config:
      title: Novo Cliente
"#,
        )
        .unwrap();

        fs::write(
            dir.path().join("churn.yml"),
            r#"
id: churn-alert
trigger: ClinicCancelled
enabled: false
actions: []
"#,
        )
        .unwrap();

        fs::write(dir.path().join("engine.yaml"), "webhook:\n  timeout_ms: 5\n").unwrap();
        fs::write(dir.path().join("not-a-workflow.txt"), "ignored").unwrap();

        let workflows = WorkflowLoader::load_directory(dir.path()).unwrap();
        assert_eq!(workflows.len(), 2);

        let ids: Vec<_> = workflows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["churn-alert", "welcome-clinic"]);
        assert!(!workflows[0].enabled);
    }

    #[test]
    fn test_load_file_rejects_invalid_definition() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");

        fs::write(
            &path,
            r#"
id: ""
trigger: ClinicCreated
"#,
        )
        .unwrap();

        let err = WorkflowLoader::load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }

    #[test]
    fn test_load_file_reports_yaml_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "id: [unclosed").unwrap();

        let err = WorkflowLoader::load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
