pub mod catalog;
pub mod mission;
pub mod pilot;
pub mod ship;
pub mod upgrade;
pub mod validate;

pub use catalog::{Catalog, DEFAULT_DATA_DIR};
pub use mission::Mission;
pub use pilot::Pilot;
pub use ship::Ship;
pub use upgrade::{Grant, Upgrade, ELITE_SLOT};
