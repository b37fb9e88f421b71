//! Ship builds: slot registry, loadout engine and the build aggregate.

pub mod card;
pub mod context;
pub mod events;
mod multiset;
pub mod ship_build;
pub mod slots;
pub mod summary;
pub mod upgrades;

pub use card::Card;
pub use context::{BuildContext, STARTING_PILOT_SKILL};
pub use events::{BuildObserver, Topic};
pub use ship_build::ShipBuild;
pub use slots::{Slot, SlotIndex, SlotKind, UpgradeSlots};
pub use summary::{BuildSummary, CardSummary, SlotSummary};
pub use upgrades::UpgradesModel;
