//! Seeded world generation.
//!
//! # Content rules
//!
//! | Entity   | Per                                   | Stats (`lvl` = required level)                  |
//! |----------|---------------------------------------|-------------------------------------------------|
//! | Location | `locations_per_type` × location type | unique cell on a `0..=grid_size` square grid    |
//! | Mob      | level × attack type                   | hp `100·lvl`, xp `25·lvl`, attack `lvl·[10,15]`  |
//! | Item     | level × item type                     | cost `50·lvl`, hp and mana `10·lvl`             |
//! | Listing  | item × town                           | potions always, others with chance `1/lvl`      |
//! | Path     | ordered pair of distinct locations    | Manhattan distance, kept if ≤ `max_path_distance` |
//!
//! Locations alternate between types so the first one generated is a town.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;
use wayfarer_core::config::WorldConfig;
use wayfarer_types::{AttackType, ItemType, LocationType, StatBonus};

use crate::blueprint::{ItemSpec, ListingSpec, LocationSpec, MobSpec, PathSpec, WorldBlueprint};
use crate::error::WorldGenError;

/// Base buy price per item level.
const COST_PER_LEVEL: u64 = 50;

/// Generate a complete world from `config`.
///
/// # Errors
///
/// Returns [`WorldGenError::InvalidConfig`] for out-of-range settings,
/// [`WorldGenError::GridTooSmall`] if the grid cannot hold every location,
/// and [`WorldGenError::Overflow`] if scaled stats do not fit.
pub fn generate(config: &WorldConfig) -> Result<WorldBlueprint, WorldGenError> {
    validate(config)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let locations = generate_locations(config, &mut rng)?;
    let mobs = generate_mobs(config.max_item_level, &mut rng)?;
    let items = generate_items(config, &mut rng)?;
    let listings = distribute_items(&locations, &items, &mut rng);
    let paths = connect_locations(&locations, config.max_path_distance);

    info!(
        seed = config.seed,
        locations = locations.len(),
        mobs = mobs.len(),
        items = items.len(),
        listings = listings.len(),
        paths = paths.len(),
        "World generated"
    );

    Ok(WorldBlueprint {
        locations,
        mobs,
        items,
        listings,
        paths,
    })
}

fn validate(config: &WorldConfig) -> Result<(), WorldGenError> {
    if config.grid_size < 0 {
        return Err(WorldGenError::InvalidConfig("grid_size must not be negative"));
    }
    if config.max_item_level < 1 {
        return Err(WorldGenError::InvalidConfig("max_item_level must be at least 1"));
    }
    if config.sale_percent > 100 {
        return Err(WorldGenError::InvalidConfig("sale_percent must not exceed 100"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Multiply a stat by the entity level.
fn scale(level: i32, value: i32) -> Result<i32, WorldGenError> {
    level
        .checked_mul(value)
        .ok_or(WorldGenError::Overflow("stat scaling"))
}

/// Roll in `lo..=hi`, collapsing to `hi` when the range is empty.
fn roll(rng: &mut impl Rng, lo: i32, hi: i32) -> i32 {
    rng.random_range(lo.min(hi)..=hi)
}

// ---------------------------------------------------------------------------
// Generation steps
// ---------------------------------------------------------------------------

fn generate_locations(
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<Vec<LocationSpec>, WorldGenError> {
    let mut cells: Vec<(i32, i32)> = (0..=config.grid_size)
        .flat_map(|x| (0..=config.grid_size).map(move |y| (x, y)))
        .collect();

    let type_count = u64::try_from(LocationType::ALL.len()).unwrap_or(u64::MAX);
    let requested = u64::from(config.locations_per_type).saturating_mul(type_count);
    let available = u64::try_from(cells.len()).unwrap_or(u64::MAX);
    if requested > available {
        return Err(WorldGenError::GridTooSmall {
            requested,
            cells: available,
        });
    }

    cells.shuffle(rng);
    let types = (0..config.locations_per_type).flat_map(|_| LocationType::ALL);
    Ok(types
        .zip(cells)
        .map(|(location_type, (x, y))| LocationSpec { x, y, location_type })
        .collect())
}

fn generate_mobs(max_level: i32, rng: &mut impl Rng) -> Result<Vec<MobSpec>, WorldGenError> {
    let mut mobs = Vec::new();
    for level in 1..=max_level {
        for attack_type in AttackType::ALL {
            let floor = level.saturating_add(1);
            mobs.push(MobSpec {
                hp: scale(level, 100)?,
                xp: scale(level, 25)?,
                req_level: level,
                attack_type,
                attack: scale(level, rng.random_range(10..=15))?,
                armour: scale(level, roll(rng, floor, 10))?,
                magic_armour: scale(level, roll(rng, floor, 10))?,
            });
        }
    }
    Ok(mobs)
}

fn generate_items(
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<Vec<ItemSpec>, WorldGenError> {
    let mut items = Vec::new();
    for level in 1..=config.max_item_level {
        let cost = u64::try_from(level)
            .ok()
            .and_then(|l| l.checked_mul(COST_PER_LEVEL))
            .ok_or(WorldGenError::Overflow("item cost"))?;
        let cost_to_sale = cost
            .checked_mul(config.sale_percent)
            .and_then(|v| v.checked_div(100))
            .ok_or(WorldGenError::Overflow("item sale price"))?;
        let floor = level.saturating_add(2);

        for item_type in ItemType::ALL {
            items.push(ItemSpec {
                cost,
                cost_to_sale,
                item_type,
                bonus: StatBonus {
                    hp: scale(level, 10)?,
                    mana: scale(level, 10)?,
                    attack: scale(level, rng.random_range(11..=16))?,
                    magic_attack: scale(level, rng.random_range(11..=16))?,
                    armour: scale(level, roll(rng, floor, 11))?,
                    magic_armour: scale(level, roll(rng, floor, 11))?,
                },
                req_level: level,
            });
        }
    }
    Ok(items)
}

fn distribute_items(
    locations: &[LocationSpec],
    items: &[ItemSpec],
    rng: &mut impl Rng,
) -> Vec<ListingSpec> {
    let mut listings = Vec::new();
    for (item_index, item) in items.iter().enumerate() {
        let one_in = u32::try_from(item.req_level).unwrap_or(1).max(1);
        for (location_index, location) in locations.iter().enumerate() {
            if !location.location_type.has_shop() {
                continue;
            }
            if item.item_type == ItemType::Potion || rng.random_ratio(1, one_in) {
                listings.push(ListingSpec {
                    location: location_index,
                    item: item_index,
                });
            }
        }
    }
    listings
}

fn connect_locations(locations: &[LocationSpec], max_distance: u32) -> Vec<PathSpec> {
    let mut paths = Vec::new();
    for (from, a) in locations.iter().enumerate() {
        for (to, b) in locations.iter().enumerate() {
            if from == to {
                continue;
            }
            let distance = a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y));
            if distance <= max_distance {
                paths.push(PathSpec { from, to, distance });
            }
        }
    }
    paths
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn small_config() -> WorldConfig {
        WorldConfig {
            seed: 7,
            locations_per_type: 5,
            grid_size: 6,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&small_config());
        let b = generate(&small_config());
        assert!(a.is_ok());
        assert_eq!(a, b);

        let other = generate(&WorldConfig {
            seed: 8,
            ..small_config()
        });
        assert_ne!(a, other);
    }

    #[test]
    fn default_world_has_expected_counts() {
        let world = generate(&WorldConfig::default()).unwrap_or_default();
        assert_eq!(world.locations.len(), 40);
        assert_eq!(world.count_locations(LocationType::Town), 20);
        assert_eq!(world.count_locations(LocationType::Dungeon), 20);
        assert_eq!(world.mobs.len(), 10);
        assert_eq!(world.items.len(), 30);
    }

    #[test]
    fn first_location_is_a_town() {
        let world = generate(&small_config()).unwrap_or_default();
        assert_eq!(
            world.locations.first().map(|l| l.location_type),
            Some(LocationType::Town)
        );
    }

    #[test]
    fn coordinates_are_unique_and_on_grid() {
        let config = WorldConfig::default();
        let world = generate(&config).unwrap_or_default();
        let cells: BTreeSet<(i32, i32)> = world.locations.iter().map(|l| (l.x, l.y)).collect();
        assert_eq!(cells.len(), world.locations.len());
        assert!(world.locations.iter().all(|l| {
            (0..=config.grid_size).contains(&l.x) && (0..=config.grid_size).contains(&l.y)
        }));
    }

    #[test]
    fn grid_too_small_is_rejected() {
        let result = generate(&WorldConfig {
            locations_per_type: 3,
            grid_size: 1,
            ..WorldConfig::default()
        });
        assert_eq!(
            result,
            Err(WorldGenError::GridTooSmall {
                requested: 6,
                cells: 4,
            })
        );
    }

    #[test]
    fn mob_stats_scale_with_level() {
        let world = generate(&WorldConfig::default()).unwrap_or_default();
        for mob in &world.mobs {
            let level = mob.req_level;
            assert_eq!(mob.hp, level * 100);
            assert_eq!(mob.xp, level * 25);
            assert!((level * 10..=level * 15).contains(&mob.attack));
            assert!((level * (level + 1).min(10)..=level * 10).contains(&mob.armour));
        }
    }

    #[test]
    fn item_prices_follow_level() {
        let world = generate(&WorldConfig::default()).unwrap_or_default();
        for item in &world.items {
            let level = u64::try_from(item.req_level).unwrap_or_default();
            assert_eq!(item.cost, 50 * level);
            assert_eq!(item.cost_to_sale, 40 * level);
            assert!(item.cost_to_sale <= item.cost);
            assert_eq!(item.bonus.hp, item.req_level * 10);
        }
        let weapons = world
            .items
            .iter()
            .filter(|i| i.item_type == ItemType::Weapon && i.req_level == 1)
            .count();
        assert_eq!(weapons, 1);
    }

    #[test]
    fn shops_only_in_towns_and_always_stock_potions() {
        let world = generate(&small_config()).unwrap_or_default();
        for listing in &world.listings {
            let location = world.locations.get(listing.location);
            assert_eq!(location.map(|l| l.location_type), Some(LocationType::Town));
        }

        let potions = world
            .items
            .iter()
            .filter(|i| i.item_type == ItemType::Potion)
            .count();
        let potion_listings = world
            .listings
            .iter()
            .filter(|l| {
                world
                    .items
                    .get(l.item)
                    .is_some_and(|i| i.item_type == ItemType::Potion)
            })
            .count();
        assert_eq!(potion_listings, potions * world.count_locations(LocationType::Town));

        // Level 1 items have a 1-in-1 chance.
        let level_one = world
            .items
            .iter()
            .filter(|i| i.req_level == 1)
            .count();
        let level_one_listings = world
            .listings
            .iter()
            .filter(|l| world.items.get(l.item).is_some_and(|i| i.req_level == 1))
            .count();
        assert_eq!(level_one_listings, level_one * world.count_locations(LocationType::Town));
    }

    #[test]
    fn paths_are_short_and_both_ways() {
        let config = small_config();
        let world = generate(&config).unwrap_or_default();
        let edges: BTreeSet<(usize, usize)> = world.paths.iter().map(|p| (p.from, p.to)).collect();
        for path in &world.paths {
            assert_ne!(path.from, path.to);
            assert!(path.distance <= config.max_path_distance);
            assert!(edges.contains(&(path.to, path.from)));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = generate(&WorldConfig {
            sale_percent: 120,
            ..WorldConfig::default()
        });
        assert!(matches!(result, Err(WorldGenError::InvalidConfig(_))));
    }

    #[test]
    fn blueprint_serializes() {
        let world = generate(&small_config()).unwrap_or_default();
        let json = serde_json::to_value(&world).unwrap_or_default();
        assert!(json.get("locations").is_some_and(serde_json::Value::is_array));
    }
}
