// src/locomotion/rig.rs
//! Transform-hierarchy access for the controllers.
//!
//! Controllers never touch `Transform`/`GlobalTransform` directly; they go
//! through [`Skeleton`], which composes world poses from the parent chain on
//! every read. Writes made earlier in a frame (body steering, head aim) are
//! therefore visible to later reads in the same frame, without waiting for
//! Bevy's `PostUpdate` propagation.

use bevy::ecs::system::SystemParam;
use bevy::log::warn_once;
use bevy::prelude::*;

/// Read/write access to a hierarchy of posed nodes.
pub trait Skeleton {
    fn local_transform(&self, node: Entity) -> Transform;
    fn set_local_transform(&mut self, node: Entity, transform: Transform);
    fn parent(&self, node: Entity) -> Option<Entity>;

    /// World transform of the node's parent (identity for roots).
    fn parent_transform(&self, node: Entity) -> GlobalTransform {
        self.parent(node)
            .map_or(GlobalTransform::IDENTITY, |parent| self.global_transform(parent))
    }

    fn global_transform(&self, node: Entity) -> GlobalTransform {
        self.parent_transform(node) * GlobalTransform::from(self.local_transform(node))
    }

    fn position(&self, node: Entity) -> Vec3 {
        self.global_transform(node).translation()
    }

    fn rotation(&self, node: Entity) -> Quat {
        self.global_transform(node).rotation()
    }

    fn set_position(&mut self, node: Entity, position: Vec3) {
        let parent = self.parent_transform(node);
        let mut local = self.local_transform(node);
        local.translation = parent.affine().inverse().transform_point3(position);
        self.set_local_transform(node, local);
    }

    fn set_rotation(&mut self, node: Entity, rotation: Quat) {
        let parent = self.parent_transform(node);
        let mut local = self.local_transform(node);
        local.rotation = (parent.rotation().inverse() * rotation).normalize();
        self.set_local_transform(node, local);
    }

    fn local_rotation(&self, node: Entity) -> Quat {
        self.local_transform(node).rotation
    }

    fn set_local_rotation(&mut self, node: Entity, rotation: Quat) {
        let mut local = self.local_transform(node);
        local.rotation = rotation;
        self.set_local_transform(node, local);
    }

    /// World-space direction expressed in the node's local frame (scale ignored).
    fn inverse_transform_direction(&self, node: Entity, direction: Vec3) -> Vec3 {
        self.rotation(node).inverse() * direction
    }

    fn up(&self, node: Entity) -> Vec3 {
        self.rotation(node) * Vec3::Y
    }

    fn forward(&self, node: Entity) -> Vec3 {
        self.rotation(node) * Vec3::NEG_Z
    }
}

/// [`Skeleton`] over the ECS `Transform` + `ChildOf` hierarchy.
///
/// Holds the only `Transform` access of the systems that use it, so those
/// systems must not query `Transform` themselves.
#[derive(SystemParam)]
pub struct Rig<'w, 's> {
    nodes: Query<'w, 's, (&'static mut Transform, Option<&'static ChildOf>)>,
}

impl Skeleton for Rig<'_, '_> {
    fn local_transform(&self, node: Entity) -> Transform {
        match self.nodes.get(node) {
            Ok((transform, _)) => *transform,
            Err(err) => {
                warn_once!("Rig: node {node} has no Transform ({err}); using identity");
                Transform::IDENTITY
            }
        }
    }

    fn set_local_transform(&mut self, node: Entity, transform: Transform) {
        if let Ok((mut current, _)) = self.nodes.get_mut(node) {
            *current = transform;
        }
    }

    fn parent(&self, node: Entity) -> Option<Entity> {
        self.nodes
            .get(node)
            .ok()
            .and_then(|(_, child_of)| child_of.map(ChildOf::parent))
    }
}
