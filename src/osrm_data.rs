//! OSRM dataset preparation for self-hosted routing.
//!
//! Downloads a Geofabrik extract and runs the OSRM MLD pipeline
//! (`osrm-extract`, `osrm-partition`, `osrm-customize`) through docker.
//! Every step is skipped when its output already exists.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "europe/france/bretagne".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Last path segment, used for file names.
    pub fn name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    /// OSRM profile script inside the image.
    pub profile_script: String,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile_script: "/opt/car.lua".to_string(),
        }
    }
}

/// Prepared dataset on disk.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error("dataset I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("extract download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("osrm preprocessing failed: {0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let region = config.region.name();
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = data_root.join(region);
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{region}-latest.osm.pbf"));
        if !pbf_path.exists() {
            info!(url = %config.region.url(), "downloading OSM extract");
            download(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{region}-latest.osrm"));
        if !osrm_base.exists() {
            info!(region, "running osrm-extract");
            run_osrm(
                &["osrm-extract", "-p", &config.profile_script, &container_path(&pbf_path)],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            info!(region, "running osrm-partition and osrm-customize");
            run_osrm(&["osrm-partition", &container_path(&osrm_base)], &data_dir)?;
            run_osrm(&["osrm-customize", &container_path(&osrm_base)], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }

    /// File name of the `.osrm` base as seen inside the container's `/data`.
    pub fn container_base(&self) -> String {
        container_path(&self.osrm_base)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
        && osrm_base.exists()
}

fn run_osrm(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "{} exited with {status}",
            args.first().copied().unwrap_or("docker")
        )))
    }
}

fn container_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    format!("/data/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_name_and_url() {
        let region = GeofabrikRegion::new("europe/monaco");
        assert_eq!(region.name(), "monaco");
        assert_eq!(
            region.url(),
            "https://download.geofabrik.de/europe/monaco-latest.osm.pbf"
        );
    }

    #[test]
    fn test_region_name_fallback() {
        assert_eq!(GeofabrikRegion::new("").name(), "region");
        assert_eq!(GeofabrikRegion::new("europe/france/").name(), "france");
    }

    #[test]
    fn test_container_path() {
        let path = Path::new("/tmp/osrm/monaco/monaco-latest.osrm");
        assert_eq!(container_path(path), "/data/monaco-latest.osrm");
    }

    #[test]
    fn test_mld_not_ready_for_missing_files() {
        assert!(!mld_ready(Path::new("/nonexistent/monaco-latest.osrm")));
    }
}
