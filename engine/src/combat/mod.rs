pub mod actions;
pub mod attack;

pub use actions::{DexterityBuff, drink_potion, equip, equip_slot, grant_weapon, guarded_attack};
pub use attack::{receive_damage, resolve_attack};
