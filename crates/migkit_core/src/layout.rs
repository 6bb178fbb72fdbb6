//! On-disk layout of a migration kit checkout.
//!
//! ```text
//! <root>/
//!   config.yaml
//!   templates/exporter-tfvars.tpl
//!   templates/manager-tfvars.tpl
//!   exporters/tfc/       Terraform Cloud exporter configuration
//!   generator/           Spacelift code generator configuration
//!   manager-stack/       Spacelift manager stack configuration
//!   out/data.json        exported data (generator input)
//!   out/main.tf          generated code
//!   out/<repo_name>/     local clone of the destination repository
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CoreResult;

/// Terraform artifacts removed from each working directory by [`MigrationLayout::clean`].
const TERRAFORM_ARTIFACTS: [&str; 5] = [
    ".terraform",
    ".terraform.lock.hcl",
    "terraform.tfstate",
    "terraform.tfstate.backup",
    "terraform.tfvars",
];

/// Resolves every path the migration touches from a single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationLayout {
    root: PathBuf,
}

impl MigrationLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Anchor `root` to the current directory.
    ///
    /// Terraform runs inside the configuration directories, so every path
    /// handed to it has to stay valid from there.
    pub fn resolve(root: &Path) -> CoreResult<Self> {
        let root = std::path::absolute(root)?;
        debug!("Migration root resolved to {:?}", root);
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn exporter_template(&self) -> PathBuf {
        self.templates_dir().join("exporter-tfvars.tpl")
    }

    pub fn manager_template(&self) -> PathBuf {
        self.templates_dir().join("manager-tfvars.tpl")
    }

    pub fn exporter_dir(&self) -> PathBuf {
        self.root.join("exporters").join("tfc")
    }

    pub fn generator_dir(&self) -> PathBuf {
        self.root.join("generator")
    }

    pub fn manager_dir(&self) -> PathBuf {
        self.root.join("manager-stack")
    }

    pub fn exporter_tfvars(&self) -> PathBuf {
        self.exporter_dir().join("terraform.tfvars")
    }

    pub fn manager_tfvars(&self) -> PathBuf {
        self.manager_dir().join("terraform.tfvars")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    /// Var-file handed to the generator's apply.
    pub fn export_data_file(&self) -> PathBuf {
        self.out_dir().join("data.json")
    }

    /// Generated code copied into the destination repository.
    pub fn generated_artifact(&self) -> PathBuf {
        self.out_dir().join("main.tf")
    }

    pub fn checkout_dir(&self, repo_name: &str) -> PathBuf {
        self.out_dir().join(repo_name)
    }

    pub fn terraform_dirs(&self) -> [PathBuf; 3] {
        [self.exporter_dir(), self.generator_dir(), self.manager_dir()]
    }

    /// Remove generated output and Terraform state so a new migration can start.
    ///
    /// Returns the paths that were removed; missing ones are skipped.
    pub fn clean(&self) -> CoreResult<Vec<PathBuf>> {
        let mut targets = vec![self.out_dir()];
        for dir in self.terraform_dirs() {
            targets.extend(TERRAFORM_ARTIFACTS.iter().map(|name| dir.join(name)));
        }

        let mut removed = Vec::new();
        for target in targets {
            let Ok(metadata) = fs::symlink_metadata(&target) else {
                continue;
            };

            if metadata.is_dir() {
                fs::remove_dir_all(&target)?;
            } else {
                fs::remove_file(&target)?;
            }
            debug!("Removed {:?}", target);
            removed.push(target);
        }

        info!("Cleaned {} path(s) under {:?}", removed.len(), self.root);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let layout = MigrationLayout::new("/work");
        assert_eq!(layout.exporter_tfvars(), Path::new("/work/exporters/tfc/terraform.tfvars"));
        assert_eq!(layout.manager_tfvars(), Path::new("/work/manager-stack/terraform.tfvars"));
        assert_eq!(layout.export_data_file(), Path::new("/work/out/data.json"));
        assert_eq!(layout.generated_artifact(), Path::new("/work/out/main.tf"));
        assert_eq!(layout.checkout_dir("tfc_migration"), Path::new("/work/out/tfc_migration"));
    }

    #[test]
    fn test_resolve_relative_root() {
        let layout = MigrationLayout::resolve(Path::new("kit")).unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert!(layout.root().is_absolute());
        assert_eq!(layout.root(), cwd.join("kit"));
        assert_eq!(layout.export_data_file(), cwd.join("kit").join("out").join("data.json"));

        let default_root = MigrationLayout::resolve(Path::new(".")).unwrap();
        assert_eq!(default_root.generator_dir(), cwd.join("generator"));
    }

    #[test]
    fn test_clean_removes_artifacts_only() {
        let dir = tempdir().unwrap();
        let layout = MigrationLayout::new(dir.path());

        for tf_dir in layout.terraform_dirs() {
            fs::create_dir_all(tf_dir.join(".terraform").join("providers")).unwrap();
            fs::write(tf_dir.join("terraform.tfstate"), "{}").unwrap();
            fs::write(tf_dir.join("main.tf"), "# keep").unwrap();
        }
        fs::create_dir_all(layout.out_dir()).unwrap();
        fs::write(layout.generated_artifact(), "# generated").unwrap();
        fs::write(layout.exporter_tfvars(), "x = 1").unwrap();

        let removed = layout.clean().unwrap();

        assert_eq!(removed.len(), 8);
        assert!(!layout.out_dir().exists());
        assert!(!layout.exporter_tfvars().exists());
        for tf_dir in layout.terraform_dirs() {
            assert!(!tf_dir.join(".terraform").exists());
            assert!(!tf_dir.join("terraform.tfstate").exists());
            assert!(tf_dir.join("main.tf").exists());
        }
    }

    #[test]
    fn test_clean_on_empty_root() {
        let dir = tempdir().unwrap();
        let removed = MigrationLayout::new(dir.path()).clean().unwrap();
        assert!(removed.is_empty());
    }
}
