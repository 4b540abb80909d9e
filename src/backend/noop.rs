use bevy::prelude::*;

/// Empty plugin for backends that need no systems of their own, such as a
/// backend whose probes are written by hand in tests.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
