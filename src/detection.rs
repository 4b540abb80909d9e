//! Probe results.
//!
//! Backends run the physics queries (ground sphere, slope ray, wall rays,
//! clearance ray) and hand the raw hits to [`ProbeResult::from_raw`], which
//! classifies them. The result is an immutable per-tick value: the state
//! machine and the force generator both read the same copy, so the order in
//! which they run cannot change what they see.

use bevy::prelude::*;

/// A single ray or shape hit.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceHit {
    /// Distance from the probe origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
}

impl SurfaceHit {
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// Classification of the ground under the body, from the slope ray.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub enum GroundSurface {
    /// Level ground, or no ground within the slope ray.
    #[default]
    Flat,
    /// Tilted but walkable ground (`0 < angle < max`).
    Slope { normal: Vec3, angle: f32 },
    /// Ground at or beyond the slope limit.
    Steep { normal: Vec3, angle: f32 },
}

impl GroundSurface {
    /// Classify a ground normal against the up axis and the slope limit (degrees).
    ///
    /// A perfectly level surface (angle exactly zero) is never a slope.
    pub fn classify(normal: Vec3, up: Vec3, max_angle: f32) -> Self {
        let angle = slope_angle_degrees(normal, up);
        if angle == 0.0 {
            Self::Flat
        } else if angle < max_angle {
            Self::Slope { normal, angle }
        } else {
            Self::Steep { normal, angle }
        }
    }

    /// Whether the body stands on a walkable slope.
    pub fn is_slope(&self) -> bool {
        matches!(self, Self::Slope { .. })
    }

    /// Slope angle in degrees, zero on flat ground.
    pub fn angle(&self) -> f32 {
        match *self {
            Self::Flat => 0.0,
            Self::Slope { angle, .. } | Self::Steep { angle, .. } => angle,
        }
    }

    /// Ground normal, `up` on flat ground.
    pub fn normal_or(&self, up: Vec3) -> Vec3 {
        match *self {
            Self::Flat => up,
            Self::Slope { normal, .. } | Self::Steep { normal, .. } => normal,
        }
    }

    /// Angle of a walkable slope, if the body is on one.
    pub fn slope_angle(&self) -> Option<f32> {
        match *self {
            Self::Slope { angle, .. } => Some(angle),
            _ => None,
        }
    }
}

/// Angle in degrees between a surface normal and the up axis.
pub fn slope_angle_degrees(normal: Vec3, up: Vec3) -> f32 {
    if normal == up {
        return 0.0;
    }
    normal.angle_between(up).to_degrees()
}

/// Project `direction` onto the plane with the given normal and normalize.
///
/// Zero when the direction is zero or parallel to the normal.
pub fn project_on_plane(direction: Vec3, normal: Vec3) -> Vec3 {
    direction.reject_from(normal).normalize_or_zero()
}

/// Which side of the body a wall was found on.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Sign of the camera tilt toward the open side.
    pub fn tilt_sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// The wall a wall run is attached to.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub side: WallSide,
    pub normal: Vec3,
}

impl WallContact {
    /// Direction along the wall, oriented to agree with `forward`.
    ///
    /// The cross product of the wall normal and `up` is flipped when it points
    /// more against the body's forward axis than along it, so forward motion is
    /// monotonic whichever side the wall is on.
    pub fn run_direction(&self, up: Vec3, forward: Vec3) -> Vec3 {
        let along = self.normal.cross(up);
        if (forward - along).length() > (forward + along).length() {
            -along
        } else {
            along
        }
    }

    /// Whether the strafe input steers away from this wall.
    pub fn steering_away(&self, strafe_sign: f32) -> bool {
        match self.side {
            WallSide::Left => strafe_sign > 0.0,
            WallSide::Right => strafe_sign < 0.0,
        }
    }
}

/// Raw query hits gathered by a backend for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawProbes {
    /// Sphere at the feet overlaps ground.
    pub ground_sphere: bool,
    /// Downward ray of `height / 2 + slope_ray_extension`.
    pub slope_ray: Option<SurfaceHit>,
    /// Downward ray of `height / 2 + landing_ray_extension`.
    pub landing_ray: bool,
    /// Downward ray of `height + min_jump_height` found ground.
    pub clearance_ray: bool,
    pub left_wall: Option<SurfaceHit>,
    pub right_wall: Option<SurfaceHit>,
}

/// Classified probe results for one decision tick.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeResult {
    /// Standing on ground.
    pub grounded: bool,
    /// Shape of the ground under the body.
    pub surface: GroundSurface,
    pub left_wall: Option<SurfaceHit>,
    pub right_wall: Option<SurfaceHit>,
    /// No ground within `height + min_jump_height`: high enough to wall run.
    pub above_ground: bool,
    /// Ground within landing range, for landing feedback.
    pub landing_contact: bool,
}

impl ProbeResult {
    /// Classify raw hits.
    ///
    /// On a walkable slope the body counts as grounded when the shorter slope
    /// ray hits, even if the feet sphere does not touch.
    pub fn from_raw(raw: RawProbes, up: Vec3, max_slope_angle: f32) -> Self {
        let surface = raw
            .slope_ray
            .map(|hit| GroundSurface::classify(hit.normal, up, max_slope_angle))
            .unwrap_or_default();
        let grounded = if surface.is_slope() {
            raw.slope_ray.is_some()
        } else {
            raw.ground_sphere
        };

        Self {
            grounded,
            surface,
            left_wall: raw.left_wall,
            right_wall: raw.right_wall,
            above_ground: !raw.clearance_ray,
            landing_contact: raw.landing_ray,
        }
    }

    /// Whether the body stands on a walkable slope.
    pub fn on_slope(&self) -> bool {
        self.surface.is_slope()
    }

    /// Whether a wall was found on either side.
    pub fn touching_wall(&self) -> bool {
        self.left_wall.is_some() || self.right_wall.is_some()
    }

    /// The active wall. The right side wins when both are touched.
    pub fn wall(&self) -> Option<WallContact> {
        self.right_wall
            .map(|hit| WallContact {
                side: WallSide::Right,
                normal: hit.normal,
            })
            .or_else(|| {
                self.left_wall.map(|hit| WallContact {
                    side: WallSide::Left,
                    normal: hit.normal,
                })
            })
    }
}
