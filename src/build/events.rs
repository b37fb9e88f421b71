//! Build change notifications. Observers are called synchronously, in
//! registration order, after the build state has been re-derived.

use std::fmt;

use serde::Serialize;

use crate::build::ShipBuild;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    UpgradesAdd,
    UpgradesLose,
    PilotAbilitiesAdd,
    PilotAbilitiesLose,
    EquippedUpgradesUpdate,
    ShipUpdate,
    PilotSkillUpdate,
}

impl Topic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpgradesAdd => "model.build.upgrades.add",
            Self::UpgradesLose => "model.build.upgrades.lose",
            Self::PilotAbilitiesAdd => "model.build.pilotAbilities.add",
            Self::PilotAbilitiesLose => "model.build.pilotAbilities.lose",
            Self::EquippedUpgradesUpdate => "model.build.equippedUpgrades.update",
            Self::ShipUpdate => "model.build.ship.update",
            Self::PilotSkillUpdate => "model.build.pilotSkill.update",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Topic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Receives every announcement made by a [`ShipBuild`].
///
/// The build is borrowed immutably for the duration of the call, so an
/// observer can read state but cannot mutate the build it is watching.
pub trait BuildObserver: Send {
    fn announce(&self, topic: Topic, build: &ShipBuild);
}

impl<F> BuildObserver for F
where
    F: Fn(Topic, &ShipBuild) + Send,
{
    fn announce(&self, topic: Topic, build: &ShipBuild) {
        self(topic, build)
    }
}
