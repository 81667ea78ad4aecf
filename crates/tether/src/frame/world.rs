use super::{OrbitCamera, Pose};
use crate::collections::FixedVec;

/// Largest pose count a frame can hold; active indices are `u16`.
pub const MAX_POSES: usize = u16::MAX as usize + 1;

/// Everything needed to draw one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldFrame {
    pub index: u32,
    pub camera: OrbitCamera,
    pub poses: Box<[Pose]>,
    /// Indices into `poses` that moved this tick.
    pub active_indices: FixedVec<u16>,
}

impl WorldFrame {
    pub fn new(pose_count: usize, camera: OrbitCamera) -> Self {
        assert!(
            pose_count <= MAX_POSES,
            "WorldFrame holds at most {MAX_POSES} poses, got {pose_count}"
        );
        Self {
            index: 0,
            camera,
            poses: vec![Pose::IDENTITY; pose_count].into_boxed_slice(),
            active_indices: FixedVec::new(pose_count),
        }
    }

    pub fn pose_count(&self) -> usize {
        self.poses.len()
    }

    /// Adds `index` to the active set. Marking an index twice in one tick
    /// keeps a single entry, so the set never outgrows the pose count.
    pub fn mark_active(&mut self, index: u16) {
        assert!(
            usize::from(index) < self.poses.len(),
            "active index {index} out of bounds for {} poses",
            self.poses.len()
        );
        if !self.active_indices.contains(&index) {
            self.active_indices.push(index);
        }
    }

    /// Value copy of `other` into `self` without allocating.
    pub fn copy_from(&mut self, other: &WorldFrame) {
        assert_eq!(
            self.poses.len(),
            other.poses.len(),
            "cannot copy between frames of different pose counts"
        );
        self.index = other.index;
        self.camera = other.camera;
        self.poses.copy_from_slice(&other.poses);
        self.active_indices.copy_from(&other.active_indices);
    }

    /// Blends `past` toward `future` by `alpha` into `out`.
    ///
    /// `out` takes `past`'s index and poses, and its active set becomes the
    /// sorted union of both frames' active sets. Only poses in that union are
    /// blended.
    pub fn interpolate(past: &WorldFrame, future: &WorldFrame, alpha: f32, out: &mut WorldFrame) {
        assert_eq!(
            past.poses.len(),
            future.poses.len(),
            "cannot interpolate frames of different pose counts"
        );

        out.copy_from(past);
        out.camera.target = past.camera.target.lerp(future.camera.target, alpha);

        out.active_indices.sort_dedup();
        let sorted = out.active_indices.len();
        for &index in future.active_indices.iter() {
            let seen = out.active_indices[..sorted].binary_search(&index).is_ok()
                || out.active_indices[sorted..].contains(&index);
            if !seen {
                out.active_indices.push(index);
            }
        }
        out.active_indices.sort_dedup();

        for &index in out.active_indices.iter() {
            let index = usize::from(index);
            out.poses[index] = Pose::lerp(&past.poses[index], &future.poses[index], alpha);
        }
    }
}
