// Workflow catalog for Cadence Workflows
//
// This module discovers workflow definition files on disk, parses and
// validates them, and indexes them by name. It is a read-only source of
// workflow specifications; the engine itself never touches storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::types::Workflow;

/// Catalog of workflow definitions discovered in a directory
pub struct WorkflowCatalog {
    /// Base directory for workflow definitions
    workflows_dir: PathBuf,
    /// Discovered workflows indexed by name
    workflows: HashMap<String, Workflow>,
}

impl WorkflowCatalog {
    /// Create a catalog and discover the workflows in `workflows_dir`
    pub fn new<P: AsRef<Path>>(workflows_dir: P) -> Result<Self> {
        let workflows_dir = workflows_dir.as_ref().to_path_buf();

        if !workflows_dir.exists() {
            return Err(anyhow::anyhow!(
                "Workflows directory does not exist: {}",
                workflows_dir.display()
            ));
        }

        let mut catalog = Self {
            workflows_dir,
            workflows: HashMap::new(),
        };

        catalog.refresh()?;

        Ok(catalog)
    }

    /// Re-scan the workflows directory, replacing the current index.
    ///
    /// Files that fail to parse or validate are logged and skipped; they
    /// never abort discovery.
    pub fn refresh(&mut self) -> Result<Vec<String>> {
        tracing::info!("Discovering workflows in {}", self.workflows_dir.display());

        self.workflows.clear();
        let mut discovered = Vec::new();

        for entry in WalkDir::new(&self.workflows_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file()
                && (path.extension().is_some_and(|ext| ext == "yaml")
                    || path.extension().is_some_and(|ext| ext == "yml"))
            {
                match Self::load_workflow(path) {
                    Ok(workflow) => {
                        tracing::debug!("Discovered workflow: {}", workflow.name);
                        discovered.push(workflow.name.clone());
                        self.workflows.insert(workflow.name.clone(), workflow);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Skipping workflow file {}: {:?}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }

        tracing::info!("Discovered {} workflows", discovered.len());
        Ok(discovered)
    }

    /// Load, parse, and validate one workflow definition file
    pub fn load_workflow<P: AsRef<Path>>(path: P) -> Result<Workflow> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow file: {}", path.display()))?;

        let workflow: Workflow = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse workflow file: {}", path.display()))?;

        let validation = workflow.validate();
        for warning in &validation.warnings {
            tracing::warn!("{}: {}", path.display(), warning);
        }
        if !validation.is_valid {
            return Err(anyhow::anyhow!(
                "Invalid workflow definition in {}: {}",
                path.display(),
                validation.errors.join("; ")
            ));
        }

        Ok(workflow)
    }

    /// Get a workflow by name
    pub fn get_workflow(&self, name: &str) -> Option<&Workflow> {
        self.workflows.get(name)
    }

    /// All discovered workflows, indexed by name
    pub fn workflows(&self) -> &HashMap<String, Workflow> {
        &self.workflows
    }

    /// Directory the catalog scans
    pub fn workflows_dir(&self) -> &Path {
        &self.workflows_dir
    }
}
