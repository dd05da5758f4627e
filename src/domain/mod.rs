// Domain layer: records, errors and the sink port. No I/O here.

pub mod model;
pub mod ports;
