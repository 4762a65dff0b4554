//! The decision capability consumed by the simulation.

/// A per-agent decision function.
///
/// Called once per agent per tick with three real-valued inputs: the agent's
/// vertical position, its vertical distance to the active obstacle's
/// gap-top reference height, and its vertical distance to the active
/// obstacle's bottom-barrier height. The output range is unconstrained; the
/// simulation interprets values above the jump threshold as "jump".
pub trait Controller {
    fn decide(&self, inputs: [f32; 3]) -> f32;
}

/// Closures double as controllers, which keeps scripted test agents terse.
impl<F> Controller for F
where
    F: Fn([f32; 3]) -> f32,
{
    fn decide(&self, inputs: [f32; 3]) -> f32 {
        self(inputs)
    }
}
