//! Clip assembly and output sinks.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::baking::BakedCurveSet;
use crate::config::ConvertConfig;
use crate::curve::{Curve, CurveBinding, CurveProperty};
use crate::data::AnimationDoc;
use crate::error::SinkError;

/// One animation's curves, ready for a target engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub looping: bool,
    /// Frames per second the key times were computed with.
    pub sample_rate: f32,
    /// Authored duration, or the last keyframe index when none was authored.
    pub duration_frames: u32,
    pub curves: Vec<CurveBinding>,
}

impl AnimationClip {
    /// Gather the curve sets of `anim` into one clip, keeping their order.
    pub fn assemble(
        anim: &AnimationDoc,
        sets: impl IntoIterator<Item = BakedCurveSet>,
        cfg: &ConvertConfig,
    ) -> Self {
        let curves: Vec<CurveBinding> = sets.into_iter().flat_map(|s| s.bindings).collect();
        let duration_frames = if anim.duration_frames > 0 {
            anim.duration_frames
        } else {
            anim.last_frame().unwrap_or(0)
        };
        Self {
            name: anim.name.clone(),
            looping: anim.looping,
            sample_rate: cfg.effective_sample_rate(),
            duration_frames,
            curves,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration_frames as f32 / self.sample_rate
    }

    pub fn curve(&self, path: &str, property: CurveProperty) -> Option<&Curve> {
        self.curves
            .iter()
            .find(|b| b.path == path && b.property == property)
            .map(|b| &b.curve)
    }
}

/// Receives finished clips. Errors abort the conversion run.
pub trait ClipSink {
    fn accept(&mut self, clip: AnimationClip) -> Result<(), SinkError>;
}

impl<S: ClipSink + ?Sized> ClipSink for &mut S {
    fn accept(&mut self, clip: AnimationClip) -> Result<(), SinkError> {
        (**self).accept(clip)
    }
}

/// Keeps clips in memory in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub clips: Vec<AnimationClip>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }
}

impl ClipSink for MemorySink {
    fn accept(&mut self, clip: AnimationClip) -> Result<(), SinkError> {
        self.clips.push(clip);
        Ok(())
    }
}

/// Writes each clip to `<dir>/<name>.anim.json`.
///
/// Clip names must be plain file names (no separators, not `.` or `..`) and
/// unique for the lifetime of the sink; anything else is rejected instead of
/// written outside `dir` or over an earlier clip.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
    pretty: bool,
    written: HashSet<String>,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
            written: HashSet::new(),
        }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn clip_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.anim.json"))
    }

    fn check_name(&self, name: &str) -> Result<(), SinkError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !plain {
            return Err(SinkError::Rejected(format!(
                "clip name '{name}' is not a plain file name"
            )));
        }
        if self.written.contains(name) {
            return Err(SinkError::Rejected(format!(
                "clip '{name}' was already written to {}",
                self.dir.display()
            )));
        }
        Ok(())
    }
}

impl ClipSink for JsonDirSink {
    fn accept(&mut self, clip: AnimationClip) -> Result<(), SinkError> {
        self.check_name(&clip.name)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&clip)?
        } else {
            serde_json::to_string(&clip)?
        };
        fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.clip_path(&clip.name);
        fs::write(&path, text).map_err(|source| SinkError::Io { path: path.clone(), source })?;
        log::debug!("wrote clip '{}' to {}", clip.name, path.display());
        self.written.insert(clip.name);
        Ok(())
    }
}
