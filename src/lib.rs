pub mod camera;
pub mod error;
pub mod fix;
pub mod geo;
pub mod gpx_import;
pub mod guidance;
pub mod instructions;
pub mod live;
pub mod path;
pub mod route;
pub mod session;
pub mod sim;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
