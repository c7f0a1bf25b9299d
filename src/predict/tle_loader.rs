use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::SatelliteInfo;

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

pub struct TleLoader {
    tle_dir: PathBuf,
    satellites: HashMap<u32, TleEntry>,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            satellites: HashMap::new(),
        }
    }

    /// Load all TLE files from the directory
    pub fn load_all(&mut self) -> Result<(), PredictError> {
        if !self.tle_dir.exists() {
            return Err(PredictError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        self.satellites.clear();

        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let is_tle = path
                .extension()
                .is_some_and(|ext| ext == "tle" || ext == "txt");
            if !is_tle {
                continue;
            }

            if let Err(e) = self.load_file(&path) {
                log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
            }
        }

        if self.satellites.is_empty() {
            return Err(PredictError::NoSatellites);
        }

        log::info!(
            "Loaded {} satellites from {}",
            self.len(),
            self.tle_dir.display()
        );
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<(), PredictError> {
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.load_str(&filename, &content)
    }

    /// Parse TLE text (may contain multiple satellites) and add it to the catalog.
    /// Nothing is added if any element set in `content` is invalid.
    pub fn load_str(&mut self, source: &str, content: &str) -> Result<(), PredictError> {
        let mut parsed = Vec::new();

        for (name, line1, line2) in parse_multi_tle(content) {
            let invalid = |message: String| PredictError::InvalidTle {
                file: source.to_string(),
                message,
            };

            let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
                .map_err(|e| invalid(e.to_string()))?;
            let constants =
                Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

            let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

            parsed.push(TleEntry {
                info: SatelliteInfo {
                    name: sat_name,
                    norad_id: elements.norad_id as u32,
                    tle_source: source.to_string(),
                },
                elements,
                constants,
            });
        }

        for entry in parsed {
            self.satellites.insert(entry.info.norad_id, entry);
        }
        Ok(())
    }

    /// Look a satellite up by its exact name or by catalog number.
    pub fn find(&self, selector: &str) -> Option<&TleEntry> {
        let selector = selector.trim();
        if let Ok(norad_id) = selector.parse::<u32>() {
            if let Some(entry) = self.satellites.get(&norad_id) {
                return Some(entry);
            }
        }
        self.satellites
            .values()
            .find(|entry| entry.info.name == selector)
    }

    pub fn get(&self, norad_id: u32) -> Option<&TleEntry> {
        self.satellites.get(&norad_id)
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    /// Download element sets from `url` into the TLE directory, replacing the
    /// previous copy of the same file.
    pub fn fetch(&self, url: &str) -> Result<PathBuf, PredictError> {
        let download_error = |message: String| PredictError::Download {
            url: url.to_string(),
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| download_error(format!("cannot create HTTP client: {e}")))?;

        log::info!("Fetching element sets from {}", url);
        let response = client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_error(format!("status {}", response.status())));
        }
        let body = response.text().map_err(|e| download_error(e.to_string()))?;

        self.store(&file_name_for(url), &body)
    }

    /// Write `content` into the TLE directory as `file_name` once every
    /// element set in it parses. The write goes through a temporary file so an
    /// existing copy is never left half written.
    pub fn store(&self, file_name: &str, content: &str) -> Result<PathBuf, PredictError> {
        let mut scratch = TleLoader::new(self.tle_dir.clone());
        scratch.load_str(file_name, content)?;
        if scratch.is_empty() {
            return Err(PredictError::InvalidTle {
                file: file_name.to_string(),
                message: "no element sets".to_string(),
            });
        }

        fs::create_dir_all(&self.tle_dir)?;
        let path = self.tle_dir.join(file_name);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        log::info!("Saved {} element sets to {}", scratch.len(), path.display());
        Ok(path)
    }
}

const FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Local file name for a download, keeping the `.tle`/`.txt` suffix that
/// `load_all` looks for.
fn file_name_for(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() {
        "downloaded.tle".to_string()
    } else if last.ends_with(".tle") || last.ends_with(".txt") {
        last.to_string()
    } else {
        format!("{last}.tle")
    }
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}
