use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flexvolt_viewer::{load_recording, ColumnGroup, Recording};

use crate::color::ChannelPalette;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A loaded file with its signal channels laid out for plotting.
pub struct LoadedRecording {
    pub path: PathBuf,
    pub recording: Recording,
    /// X axis shared by both plots.
    pub time_axis: Vec<f64>,
    pub processed: Vec<Vec<f64>>,
    pub raw: Vec<Vec<f64>>,
    pub processed_palette: ChannelPalette,
    pub raw_palette: ChannelPalette,
}

impl LoadedRecording {
    pub fn new(path: PathBuf, recording: Recording) -> Self {
        let time_axis = recording.time_axis();
        let processed = recording.processed.channels();
        let raw = recording.raw.channels();
        let processed_palette = ChannelPalette::new(processed.len(), 0.0);
        let raw_palette = ChannelPalette::new(raw.len(), 200.0);
        Self {
            path,
            recording,
            time_axis,
            processed,
            raw,
            processed_palette,
            raw_palette,
        }
    }

    /// Channels and colours of a plotted group.
    pub fn series(&self, group: ColumnGroup) -> (&[Vec<f64>], &ChannelPalette) {
        match group {
            ColumnGroup::Raw => (&self.raw, &self.raw_palette),
            _ => (&self.processed, &self.processed_palette),
        }
    }

    pub fn has_time_column(&self) -> bool {
        !self.recording.time.is_empty()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded recording (None until a file is opened).
    pub loaded: Option<LoadedRecording>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the two plots share their x axis while panning and zooming.
    pub link_x: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            link_x: true,
            ..Default::default()
        }
    }

    /// Load a file, replacing the current recording.  On failure the
    /// previous recording stays and the error goes to `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        match read_recording(path) {
            Ok(recording) => self.set_recording(path.to_path_buf(), recording),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded recording.
    pub fn set_recording(&mut self, path: PathBuf, recording: Recording) {
        self.loaded = Some(LoadedRecording::new(path, recording));
        self.status_message = None;
    }

    /// One-line description of the loaded file for the top bar.
    pub fn summary(&self) -> Option<String> {
        let loaded = self.loaded.as_ref()?;
        Some(format!(
            "{}: {} samples, {} processed / {} raw channels",
            loaded.file_name(),
            loaded.recording.n_samples,
            loaded.processed.len(),
            loaded.raw.len(),
        ))
    }

    /// The metadata header as pretty-printed JSON.
    pub fn metadata_json(&self) -> Option<String> {
        let loaded = self.loaded.as_ref()?;
        match serde_json::to_string_pretty(&loaded.recording.metadata) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Cannot serialise metadata: {e}");
                None
            }
        }
    }
}

fn read_recording(path: &Path) -> Result<Recording> {
    load_recording(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_channels_for_plotting() {
        let file = write_file(
            "{'rate': 1000, 'ok': true}\nTime,Raw 1,Raw 2,Processed 1\n0,1,2,3\n0.5,4,5,6\n",
        );
        let mut state = AppState::new();
        state.load_path(file.path());

        let loaded = state.loaded.as_ref().unwrap();
        assert_eq!(loaded.time_axis, vec![0.0, 0.5]);
        assert_eq!(loaded.raw, vec![vec![1.0, 4.0], vec![2.0, 5.0]]);
        assert_eq!(loaded.processed, vec![vec![3.0, 6.0]]);
        assert!(loaded.has_time_column());
        assert!(state.status_message.is_none());
        assert!(state.summary().unwrap().contains("2 samples, 1 processed / 2 raw channels"));

        let json = state.metadata_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rate"], 1000);
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn failed_load_keeps_previous_recording() {
        let good = write_file("{}\ntime,raw\n0,1\n");
        let bad = write_file("{}\ntime,raw\n0\n");
        let mut state = AppState::new();
        state.load_path(good.path());
        state.load_path(bad.path());

        assert!(state.loaded.is_some());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: loading"));
        assert!(msg.contains("expected 2 fields, found 1"));
    }

    #[test]
    fn missing_file_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new();
        state.load_path(&dir.path().join("missing.txt"));
        assert!(state.loaded.is_none());
        assert!(state.status_message.unwrap().contains("cannot read"));
    }
}
