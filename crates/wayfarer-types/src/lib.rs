//! Shared type definitions for the Wayfarer game engine.
//!
//! This crate is the single source of truth for the entity model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the conversational front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for all entity keys
//! - [`enums`] -- Location, item and attack type enumerations
//! - [`structs`] -- Entity structs (persons, items, locations, journeys)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AttackType, ItemType, LocationType, UnknownVariant};
pub use ids::{
    ItemId, ItemInLocationId, JourneyId, LocationId, MobId, PathId, PersonId, PersonItemId,
};
pub use structs::{
    Destination, Item, ItemInLocation, Journey, Location, Mob, NewPerson, OwnedItem, Path,
    Person, PersonItem, StatBonus,
};

#[cfg(test)]
mod tests {
    //! Type export checks for `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::ids::PersonId::export_all();
        let _ = crate::ids::LocationId::export_all();
        let _ = crate::ids::ItemId::export_all();
        let _ = crate::ids::PersonItemId::export_all();
        let _ = crate::ids::PathId::export_all();
        let _ = crate::ids::JourneyId::export_all();

        let _ = crate::enums::LocationType::export_all();
        let _ = crate::enums::ItemType::export_all();
        let _ = crate::enums::AttackType::export_all();

        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::Person::export_all();
        let _ = crate::structs::StatBonus::export_all();
        let _ = crate::structs::Item::export_all();
        let _ = crate::structs::PersonItem::export_all();
        let _ = crate::structs::OwnedItem::export_all();
        let _ = crate::structs::Path::export_all();
        let _ = crate::structs::Destination::export_all();
        let _ = crate::structs::Journey::export_all();
        let _ = crate::structs::Mob::export_all();
    }
}
