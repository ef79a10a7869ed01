//! Stock entity kinds.
//!
//! Each kind is a [`Behavior`](tessel_entity::behavior::Behavior) plus a
//! constructor that builds its [`Body`](tessel_entity::body::Body). Register
//! them all at startup with [`register_defaults`]; level data can then spawn
//! them by key.

pub mod energy_bullet;
pub mod pickup;
pub mod player;
pub mod walker;

use tessel_entity::factory::EntityFactory;

pub use energy_bullet::EnergyBullet;
pub use pickup::Pickup;
pub use player::Player;
pub use walker::Walker;

/// Register every stock kind under its type key.
pub fn register_defaults(factory: &mut EntityFactory) {
    factory.register(energy_bullet::TYPE_KEY, energy_bullet::create);
    factory.register(pickup::TYPE_KEY, pickup::create);
    factory.register(walker::TYPE_KEY, walker::create);
    factory.register(player::TYPE_KEY, player::create);
}
