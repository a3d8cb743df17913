mod mat3;
mod pose;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use pose::Pose;
pub use quat::Quat;
pub use vec3::Vec3;

/// Tolerances shared by the geometry and dynamics code
pub mod consts {
    /// General-purpose epsilon for floating point comparisons
    pub const EPSILON: f32 = 1e-6;

    /// Squared-length floor below which a vector is treated as zero
    pub const NORMALIZE_EPSILON_SQ: f32 = 1e-12;

    /// Cross products of box axes shorter than this are skipped by SAT.
    /// Nearly parallel edges produce axes that are mostly rounding noise.
    pub const SAT_AXIS_EPSILON: f32 = 1e-5;

    /// Slack used when deciding whether a contact candidate lies inside a region
    pub const CONTAINMENT_TOLERANCE: f32 = 1e-4;
}
