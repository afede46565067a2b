use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    error::{BizsimResult, IoError},
    report::{
        io::{FileExtension, report_filename},
        marketing_leads::MarketingLeads,
        retail_sales::RetailSales,
    },
};

/// Environment variable relocating the working root.
pub const ROOT_ENV: &str = "BIZSIM_ROOT";

pub const DATA_DIR: &str = "data";
pub const DASHBOARDS_DIR: &str = "dashboards";
pub const MANIFEST_FILE: &str = "generation_manifest.json";
pub const RETAIL_DASHBOARD_FILE: &str = "retail-inventory.html";
pub const LEAD_DASHBOARD_FILE: &str = "lead-conversion.html";

/// On-disk layout shared by the generator and the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at `$BIZSIM_ROOT`, or the current directory when unset.
    pub fn from_env() -> Self {
        env::var_os(ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn dashboards_dir(&self) -> PathBuf {
        self.root.join(DASHBOARDS_DIR)
    }

    pub fn retail_csv(&self) -> PathBuf {
        self.data_dir()
            .join(report_filename(RetailSales::BASE_NAME, FileExtension::Csv))
    }

    pub fn leads_csv(&self) -> PathBuf {
        self.data_dir()
            .join(report_filename(MarketingLeads::BASE_NAME, FileExtension::Csv))
    }

    pub fn manifest(&self) -> PathBuf {
        self.data_dir().join(MANIFEST_FILE)
    }

    pub fn retail_dashboard(&self) -> PathBuf {
        self.dashboards_dir().join(RETAIL_DASHBOARD_FILE)
    }

    pub fn lead_dashboard(&self) -> PathBuf {
        self.dashboards_dir().join(LEAD_DASHBOARD_FILE)
    }

    /// Returns every renderer input that does not exist yet.
    pub fn missing_inputs(&self) -> Vec<PathBuf> {
        [self.retail_csv(), self.leads_csv()]
            .into_iter()
            .filter(|p| !p.is_file())
            .collect()
    }

    /// Fails with [`IoError::MissingInput`] naming the first absent input.
    pub fn require_inputs(&self) -> BizsimResult<()> {
        match self.missing_inputs().into_iter().next() {
            Some(path) => Err(IoError::MissingInput(path).into()),
            None => Ok(()),
        }
    }
}

pub fn ensure_dir(dir: &Path) -> BizsimResult<()> {
    fs::create_dir_all(dir).map_err(|e| {
        IoError::FileSystem(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    Ok(())
}

/// Writes `contents` to `path`, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> BizsimResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .map_err(|e| IoError::WriteFailed(format!("'{}': {e}", path.display())))?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> BizsimResult<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(IoError::Json)?;
    text.push('\n');
    write_text(path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_the_layout() {
        let layout = DataLayout::new("/tmp/x");
        assert_eq!(
            layout.retail_csv(),
            PathBuf::from("/tmp/x/data/retail_sales_cleaned.csv")
        );
        assert_eq!(
            layout.leads_csv(),
            PathBuf::from("/tmp/x/data/marketing_leads_cleaned.csv")
        );
        assert_eq!(
            layout.lead_dashboard(),
            PathBuf::from("/tmp/x/dashboards/lead-conversion.html")
        );
    }

    #[test]
    fn missing_inputs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        assert_eq!(layout.missing_inputs().len(), 2);
        let err = layout.require_inputs().unwrap_err();
        assert!(err.is_missing_input());

        write_text(&layout.retail_csv(), "a\n1\n").unwrap();
        write_text(&layout.leads_csv(), "a\n1\n").unwrap();
        assert!(layout.missing_inputs().is_empty());
        layout.require_inputs().unwrap();
    }

    #[test]
    fn json_files_end_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_json(&path, &serde_json::json!({"a": 1})).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.ends_with("}\n"));
    }
}
