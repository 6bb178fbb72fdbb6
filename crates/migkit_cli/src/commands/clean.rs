//! Clean command - Remove generated output and Terraform state.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use migkit_core::MigrationLayout;

pub fn execute(root: &Path) -> Result<()> {
    let layout = MigrationLayout::resolve(root)?;
    info!("Cleaning migration artifacts under {:?}", layout.root());

    let removed = layout
        .clean()
        .with_context(|| format!("Failed to clean {}", root.display()))?;

    if removed.is_empty() {
        println!("✅ Nothing to clean");
    } else {
        println!("🧹 Removed {} path(s):", removed.len());
        for path in &removed {
            println!("   - {}", path.display());
        }
        println!("✅ Ready for a new migration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_keeps_configuration() {
        let root = TempDir::new().unwrap();
        let layout = MigrationLayout::new(root.path());
        fs::write(layout.config_file(), "migration_data: {}\n").unwrap();
        fs::create_dir_all(layout.out_dir()).unwrap();
        fs::write(layout.export_data_file(), "{}").unwrap();

        execute(root.path()).unwrap();

        assert!(!layout.out_dir().exists());
        assert!(layout.config_file().exists());
    }
}
