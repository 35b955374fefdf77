//! Hit-testing a pointer against jar bounds
//!
//! Screen space has y growing downward; game space has y growing upward and
//! is centered on the table. A jar's hit-box follows its current slot, shifted
//! and narrowed by its own calibration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Container, ContainerId};
use crate::error::ConfigError;

/// Per-jar hit-box calibration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Horizontal shift of the hit-box relative to the nominal position
    pub x_shift: f32,
    /// Trim from the left edge
    pub left_inset: f32,
    /// Trim from the right edge
    pub right_inset: f32,
}

/// Axis-aligned rectangle, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Declared bounds of a jar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub size: Vec2,
    /// Anchor within the box, (0.5, 0.5) is centered
    pub anchor: Vec2,
    pub calibration: Calibration,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            size: Vec2::new(160.0, 200.0),
            anchor: Vec2::splat(0.5),
            calibration: Calibration::default(),
        }
    }
}

impl Bounds {
    /// Hit-box when the jar sits at `position`
    pub fn hit_box(&self, position: Vec2) -> Rect {
        let x = position.x + self.calibration.x_shift;
        let y = position.y;
        let w = self.size.x;
        let h = self.size.y;
        Rect {
            min: Vec2::new(
                x - w * self.anchor.x + self.calibration.left_inset,
                y - h * self.anchor.y,
            ),
            max: Vec2::new(
                x + w * (1.0 - self.anchor.x) - self.calibration.right_inset,
                y + h * (1.0 - self.anchor.y),
            ),
        }
    }
}

/// Screen to game coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Visible screen size in pixels
    pub screen_size: Vec2,
    /// Size of the layout's reference frame in game units
    pub reference_size: Vec2,
    /// Global calibration offset (game units)
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            screen_size: Vec2::new(960.0, 640.0),
            reference_size: Vec2::new(960.0, 640.0),
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Convert a screen point (y down, origin top-left) to game space
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        let nx = screen.x / self.screen_size.x - 0.5;
        let ny = (self.screen_size.y - screen.y) / self.screen_size.y - 0.5;
        self.offset + Vec2::new(nx, ny) * self.reference_size
    }

    /// Inverse of [`Viewport::to_world`]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        let n = (world - self.offset) / self.reference_size + Vec2::splat(0.5);
        Vec2::new(n.x * self.screen_size.x, self.screen_size.y - n.y * self.screen_size.y)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_size.x <= 0.0 || self.screen_size.y <= 0.0 {
            return Err(ConfigError::InvalidViewport("screen size must be positive"));
        }
        if self.reference_size.x <= 0.0 || self.reference_size.y <= 0.0 {
            return Err(ConfigError::InvalidViewport("reference size must be positive"));
        }
        Ok(())
    }
}

/// Classify a screen point against the jars.
///
/// `slot_positions[s]` is the nominal position of slot `s`. Jars are tested
/// highest id first so the topmost of two overlapping hit-boxes wins.
/// Inactive jars never match.
pub fn classify(
    pointer: Vec2,
    viewport: &Viewport,
    containers: &[Container],
    slot_positions: &[Vec2],
) -> Option<ContainerId> {
    classify_world(viewport.to_world(pointer), containers, slot_positions)
}

/// Same as [`classify`] for a point already in game space
pub fn classify_world(
    point: Vec2,
    containers: &[Container],
    slot_positions: &[Vec2],
) -> Option<ContainerId> {
    let mut ordered: Vec<&Container> = containers.iter().collect();
    ordered.sort_by(|a, b| b.id.cmp(&a.id));

    ordered
        .into_iter()
        .filter(|c| c.active)
        .find(|c| {
            slot_positions
                .get(c.slot)
                .is_some_and(|pos| c.bounds.hit_box(*pos).contains(point))
        })
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar(id: usize, width: f32) -> Container {
        Container {
            id: ContainerId(id),
            slot: id,
            bounds: Bounds {
                size: Vec2::new(width, 100.0),
                anchor: Vec2::splat(0.5),
                calibration: Calibration::default(),
            },
            active: true,
        }
    }

    #[test]
    fn test_hit_box_centered() {
        let b = Bounds {
            size: Vec2::new(100.0, 50.0),
            anchor: Vec2::splat(0.5),
            calibration: Calibration::default(),
        };
        let r = b.hit_box(Vec2::new(10.0, 20.0));
        assert_eq!(r.min, Vec2::new(-40.0, -5.0));
        assert_eq!(r.max, Vec2::new(60.0, 45.0));
    }

    #[test]
    fn test_hit_box_calibration() {
        let b = Bounds {
            size: Vec2::new(100.0, 100.0),
            anchor: Vec2::new(0.0, 0.0),
            calibration: Calibration {
                x_shift: 5.0,
                left_inset: 10.0,
                right_inset: 20.0,
            },
        };
        let r = b.hit_box(Vec2::ZERO);
        assert_eq!(r.min, Vec2::new(15.0, 0.0));
        assert_eq!(r.max, Vec2::new(85.0, 100.0));
    }

    #[test]
    fn test_viewport_flips_y() {
        let vp = Viewport::default();
        // Screen center maps to the origin
        assert_eq!(vp.to_world(Vec2::new(480.0, 320.0)), Vec2::ZERO);
        // Top of the screen is positive y
        assert_eq!(vp.to_world(Vec2::new(480.0, 0.0)), Vec2::new(0.0, 320.0));
        // Bottom-left corner
        assert_eq!(vp.to_world(Vec2::new(0.0, 640.0)), Vec2::new(-480.0, -320.0));
    }

    #[test]
    fn test_viewport_scale_and_offset() {
        let vp = Viewport {
            screen_size: Vec2::new(480.0, 320.0),
            reference_size: Vec2::new(960.0, 640.0),
            offset: Vec2::new(100.0, -50.0),
        };
        assert_eq!(vp.to_world(Vec2::new(240.0, 160.0)), Vec2::new(100.0, -50.0));
        assert_eq!(vp.to_world(Vec2::new(480.0, 160.0)), Vec2::new(580.0, -50.0));
        let world = Vec2::new(33.0, -12.0);
        assert!(vp.to_world(vp.to_screen(world)).abs_diff_eq(world, 1e-3));
    }

    #[test]
    fn test_classify_picks_matching_jar() {
        let jars = vec![jar(0, 100.0), jar(1, 100.0), jar(2, 100.0)];
        let slots = [Vec2::new(-200.0, 0.0), Vec2::ZERO, Vec2::new(200.0, 0.0)];
        assert_eq!(classify_world(Vec2::new(-190.0, 10.0), &jars, &slots), Some(ContainerId(0)));
        assert_eq!(classify_world(Vec2::new(210.0, -40.0), &jars, &slots), Some(ContainerId(2)));
        assert_eq!(classify_world(Vec2::new(100.0, 0.0), &jars, &slots), None);
    }

    #[test]
    fn test_classify_follows_slot() {
        let mut jars = vec![jar(0, 100.0), jar(1, 100.0)];
        let slots = [Vec2::new(-200.0, 0.0), Vec2::new(200.0, 0.0)];
        jars[0].slot = 1;
        jars[1].slot = 0;
        assert_eq!(classify_world(Vec2::new(-200.0, 0.0), &jars, &slots), Some(ContainerId(1)));
    }

    #[test]
    fn test_classify_overlap_prefers_higher_index() {
        let jars = vec![jar(0, 300.0), jar(1, 300.0)];
        let slots = [Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)];
        assert_eq!(classify_world(Vec2::ZERO, &jars, &slots), Some(ContainerId(1)));
    }

    #[test]
    fn test_classify_skips_inactive() {
        let mut jars = vec![jar(0, 300.0), jar(1, 300.0)];
        let slots = [Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)];
        jars[1].active = false;
        assert_eq!(classify_world(Vec2::ZERO, &jars, &slots), Some(ContainerId(0)));
        jars[0].active = false;
        assert_eq!(classify_world(Vec2::ZERO, &jars, &slots), None);
    }

    #[test]
    fn test_inset_resolves_overlap() {
        let mut jars = vec![jar(0, 300.0), jar(1, 300.0)];
        let slots = [Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)];
        // Narrow jar 1 from the left so the middle belongs to jar 0
        jars[1].bounds.calibration.left_inset = 150.0;
        assert_eq!(classify_world(Vec2::ZERO, &jars, &slots), Some(ContainerId(0)));
        assert_eq!(classify_world(Vec2::new(60.0, 0.0), &jars, &slots), Some(ContainerId(1)));
    }

    #[test]
    fn test_classify_from_screen() {
        let jars = vec![jar(0, 100.0)];
        let slots = [Vec2::new(0.0, 100.0)];
        let vp = Viewport::default();
        // 100 units above center is 100 px above the screen center
        assert_eq!(classify(Vec2::new(480.0, 220.0), &vp, &jars, &slots), Some(ContainerId(0)));
        assert_eq!(classify(Vec2::new(480.0, 420.0), &vp, &jars, &slots), None);
    }
}
