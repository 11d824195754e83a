//! Converter: owns the configuration and runs the whole pipeline.
//!
//! Steps, in order: slice the atlas, build the armature, then per animation
//! build its inversion timeline, bake its tracks and assemble a clip. All
//! clips are baked before the first one reaches the sink.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::armature::{Armature, RestPose};
use crate::atlas::SliceTable;
use crate::baking::bake_animation;
use crate::clip::{AnimationClip, ClipSink};
use crate::config::ConvertConfig;
use crate::data::{AnimationDoc, ArmatureDoc, AtlasDoc, ExportDoc};
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;

/// Documents handed over by the loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertInput {
    pub armature: Option<ArmatureDoc>,
    pub atlas: Option<AtlasDoc>,
    pub animations: Option<Vec<AnimationDoc>>,
}

impl ConvertInput {
    pub fn from_export(export: ExportDoc, atlas: Option<AtlasDoc>) -> Self {
        Self {
            armature: export.armature,
            atlas,
            animations: export.animations,
        }
    }
}

/// Everything a run produces before clips are handed to a sink.
#[derive(Clone, Debug)]
pub struct BakeOutput {
    pub slices: SliceTable,
    pub armature: Armature,
    pub clips: Vec<AnimationClip>,
    pub diagnostics: Diagnostics,
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub slices: SliceTable,
    pub rest_pose: RestPose,
    /// Names of the clips accepted by the sink, in order.
    pub clips: Vec<String>,
    pub diagnostics: Diagnostics,
}

#[derive(Clone, Debug, Default)]
pub struct Converter {
    cfg: ConvertConfig,
}

impl Converter {
    pub fn new(cfg: ConvertConfig) -> Self {
        Self { cfg }
    }

    /// Run every stage except the sink.
    pub fn bake(&self, input: &ConvertInput) -> Result<BakeOutput, ConvertError> {
        let armature_doc = input
            .armature
            .as_ref()
            .ok_or(ConvertError::ConfigMissing("armature description"))?;
        let atlas_doc = input
            .atlas
            .as_ref()
            .ok_or(ConvertError::ConfigMissing("atlas metadata"))?;
        let animations = input
            .animations
            .as_deref()
            .ok_or(ConvertError::ConfigMissing("animation set"))?;

        let mut diagnostics = Diagnostics::new();
        let slices = SliceTable::from_doc(atlas_doc);
        let armature = Armature::build(armature_doc, &slices, &self.cfg, &mut diagnostics);

        let bake_one = |anim: &AnimationDoc| {
            let (sets, diag) = bake_animation(&armature, anim, &self.cfg);
            (AnimationClip::assemble(anim, sets, &self.cfg), diag)
        };
        let baked: Vec<(AnimationClip, Diagnostics)> = if self.cfg.parallel {
            animations.par_iter().map(bake_one).collect()
        } else {
            animations.iter().map(bake_one).collect()
        };

        let mut clips = Vec::with_capacity(baked.len());
        for (clip, diag) in baked {
            diagnostics.merge(diag);
            clips.push(clip);
        }

        Ok(BakeOutput {
            slices,
            armature,
            clips,
            diagnostics,
        })
    }

    /// Bake everything, then emit each clip to `sink` in declaration order.
    /// The first sink error aborts the run.
    pub fn run<S: ClipSink + ?Sized>(
        &self,
        input: &ConvertInput,
        sink: &mut S,
    ) -> Result<ConversionReport, ConvertError> {
        let output = self.bake(input)?;
        let mut emitted = Vec::with_capacity(output.clips.len());
        for clip in output.clips {
            let name = clip.name.clone();
            sink.accept(clip)
                .map_err(|source| ConvertError::Sink {
                    clip: name.clone(),
                    source,
                })?;
            emitted.push(name);
        }
        log::info!(
            "converted armature '{}': {} clips, {} warnings",
            output.armature.name,
            emitted.len(),
            output.diagnostics.len()
        );
        Ok(ConversionReport {
            slices: output.slices,
            rest_pose: output.armature.rest_pose(),
            clips: emitted,
            diagnostics: output.diagnostics,
        })
    }
}
