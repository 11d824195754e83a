//! Armature building: resolves the exporter's flat bone list into an
//! arena-indexed hierarchy with rest transforms in engine units.
//!
//! Parents are looked up by name among bones declared *earlier*, so every
//! parent id is smaller than its child's and the hierarchy cannot cycle.
//! Names are not required to be unique: the name map keeps the last bone
//! declared under a name, and lookups (parents, tracks) see that bone.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::atlas::{SliceTable, SpriteSlice};
use crate::config::ConvertConfig;
use crate::data::{ArmatureDoc, AttachmentDoc, BoneDoc, TransformDoc};
use crate::diagnostics::{Diagnostics, Warning};
use crate::ids::{BoneId, IdAllocator};

/// Transform relative to the parent node, engine units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    /// x, y and depth.
    pub position: [f32; 3],
    pub scale: [f32; 2],
    /// About the depth axis, in the configured angle unit.
    pub rotation: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }
}

impl LocalTransform {
    pub fn from_doc(doc: &TransformDoc, cfg: &ConvertConfig) -> Self {
        Self {
            position: [
                cfg.to_engine_units(doc.position.x),
                cfg.to_engine_units(doc.position.y),
                0.0,
            ],
            scale: [doc.scale.x, doc.scale.y],
            rotation: cfg.angle_unit.from_radians(doc.rotation),
        }
    }
}

/// Child of a resolved attachment that carries the atlas pivot and draw depth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteNode {
    pub slice: SpriteSlice,
    /// (pivot.x, pivot.y, -bone.z), engine units.
    pub position: [f32; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Position in the owning bone's attachment list.
    pub slot_index: u32,
    pub rest: LocalTransform,
    /// `None` when the atlas has no slice of this name.
    pub sprite: Option<SpriteNode>,
}

impl Attachment {
    pub fn slice(&self) -> Option<&SpriteSlice> {
        self.sprite.as_ref().map(|s| &s.slice)
    }

    /// Whether this slot is shown when the bone's display index is `display_index`.
    #[inline]
    pub fn is_displayed(&self, display_index: i32) -> bool {
        i64::from(self.slot_index) == i64::from(display_index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    /// Parent name as authored, even when it did not resolve.
    pub parent_name: String,
    /// `None` for bones attached to the armature root.
    pub parent: Option<BoneId>,
    pub rest: LocalTransform,
    pub z: i32,
    pub display_index: i32,
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Armature {
    pub name: String,
    bones: Vec<Bone>,
    by_name: IndexMap<String, BoneId>,
}

impl Armature {
    /// Build the hierarchy from `doc`, resolving attachment sprites against `slices`.
    /// Unresolved parents, duplicate names and missing slices are recorded in `diag`.
    pub fn build(
        doc: &ArmatureDoc,
        slices: &SliceTable,
        cfg: &ConvertConfig,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut ids = IdAllocator::new();
        let mut bones: Vec<Bone> = Vec::with_capacity(doc.bones.len());
        let mut by_name: IndexMap<String, BoneId> = IndexMap::with_capacity(doc.bones.len());

        for bone_doc in &doc.bones {
            let id = ids.alloc_bone();

            let parent = if bone_doc.parent.is_empty() {
                None
            } else {
                let found = by_name.get(&bone_doc.parent).copied();
                if found.is_none() {
                    diag.push(Warning::UnresolvedParent {
                        bone: bone_doc.name.clone(),
                        parent: bone_doc.parent.clone(),
                    });
                }
                found
            };

            let mut attachments = Vec::with_capacity(bone_doc.attachments.len());
            for (slot, attachment_doc) in bone_doc.attachments.iter().enumerate() {
                attachments.push(build_attachment(
                    bone_doc,
                    slot as u32,
                    attachment_doc,
                    slices,
                    cfg,
                    diag,
                ));
            }

            if by_name.insert(bone_doc.name.clone(), id).is_some() {
                diag.push(Warning::DuplicateBoneName {
                    bone: bone_doc.name.clone(),
                });
            }

            bones.push(Bone {
                id,
                name: bone_doc.name.clone(),
                parent_name: bone_doc.parent.clone(),
                parent,
                rest: LocalTransform::from_doc(&bone_doc.transform, cfg),
                z: bone_doc.z,
                display_index: bone_doc.display_index,
                attachments,
            });
        }

        log::debug!("built armature '{}' with {} bones", doc.name, bones.len());
        Self {
            name: doc.name.clone(),
            bones,
            by_name,
        }
    }

    #[inline]
    pub fn bone(&self, id: BoneId) -> &Bone {
        &self.bones[id.index()]
    }

    /// The last bone declared under `name`.
    pub fn find(&self, name: &str) -> Option<&Bone> {
        self.by_name.get(name).map(|id| self.bone(*id))
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Strict ancestors of `id`, parent first, ending below the root.
    pub fn ancestors(&self, id: BoneId) -> Ancestors<'_> {
        Ancestors {
            armature: self,
            next: self.bone(id).parent,
        }
    }

    /// Slash-joined names from the topmost bone down to `id`.
    pub fn bone_path(&self, id: BoneId) -> String {
        let mut names: Vec<&str> = self.ancestors(id).map(|b| b.name.as_str()).collect();
        names.reverse();
        names.push(&self.bone(id).name);
        names.join("/")
    }

    pub fn attachment_path(&self, id: BoneId, attachment: &Attachment) -> String {
        format!("{}/{}", self.bone_path(id), attachment.name)
    }

    /// Path of the sprite node under `attachment`; attachment curves bind here.
    pub fn sprite_path(&self, id: BoneId, attachment: &Attachment) -> String {
        format!(
            "{}/{}",
            self.attachment_path(id, attachment),
            attachment.slot_index
        )
    }

    /// Flatten the hierarchy into the nodes the baked clips animate.
    /// Unresolved attachments are left out.
    pub fn rest_pose(&self) -> RestPose {
        let mut nodes = Vec::new();
        for bone in &self.bones {
            nodes.push(RestNode {
                path: self.bone_path(bone.id),
                kind: RestNodeKind::Bone,
                transform: bone.rest,
                sprite: None,
                active: true,
            });
            for attachment in &bone.attachments {
                let Some(sprite) = &attachment.sprite else {
                    continue;
                };
                nodes.push(RestNode {
                    path: self.attachment_path(bone.id, attachment),
                    kind: RestNodeKind::Attachment,
                    transform: attachment.rest,
                    sprite: None,
                    active: true,
                });
                nodes.push(RestNode {
                    path: self.sprite_path(bone.id, attachment),
                    kind: RestNodeKind::Sprite,
                    transform: LocalTransform {
                        position: sprite.position,
                        ..LocalTransform::default()
                    },
                    sprite: Some(sprite.slice.name.clone()),
                    active: attachment.is_displayed(bone.display_index),
                });
            }
        }
        RestPose {
            armature: self.name.clone(),
            nodes,
        }
    }
}

fn build_attachment(
    bone_doc: &BoneDoc,
    slot_index: u32,
    doc: &AttachmentDoc,
    slices: &SliceTable,
    cfg: &ConvertConfig,
    diag: &mut Diagnostics,
) -> Attachment {
    let sprite = match slices.lookup(&doc.name) {
        Ok(slice) => Some(SpriteNode {
            slice: slice.clone(),
            position: [
                cfg.to_engine_units(slice.pivot.x),
                cfg.to_engine_units(slice.pivot.y),
                -cfg.to_engine_units(bone_doc.z as f32),
            ],
        }),
        Err(_) => {
            diag.push(Warning::MissingSlice {
                bone: bone_doc.name.clone(),
                attachment: doc.name.clone(),
            });
            None
        }
    };
    Attachment {
        name: doc.name.clone(),
        slot_index,
        rest: LocalTransform::from_doc(&doc.transform, cfg),
        sprite,
    }
}

/// Iterator over a bone's strict ancestors.
pub struct Ancestors<'a> {
    armature: &'a Armature,
    next: Option<BoneId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Bone;

    fn next(&mut self) -> Option<Self::Item> {
        let bone = self.armature.bone(self.next?);
        self.next = bone.parent;
        Some(bone)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestNodeKind {
    Bone,
    Attachment,
    Sprite,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestNode {
    pub path: String,
    pub kind: RestNodeKind,
    pub transform: LocalTransform,
    /// Atlas slice drawn by a sprite node.
    pub sprite: Option<String>,
    /// Initial visibility; only sprite nodes start hidden.
    pub active: bool,
}

/// Scene layout the clips of one armature animate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestPose {
    pub armature: String,
    pub nodes: Vec<RestNode>,
}

impl RestPose {
    pub fn node(&self, path: &str) -> Option<&RestNode> {
        self.nodes.iter().find(|n| n.path == path)
    }
}
