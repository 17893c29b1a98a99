mod ice_cream;

pub use ice_cream::*;
