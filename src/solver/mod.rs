mod impulse;

pub use impulse::{ImpulseResolver, ResolverConfig};
