// Domain layer: course models, ports (interfaces) and the pure
// enrichment services. No I/O happens here.

pub mod model;
pub mod ports;
pub mod services;
