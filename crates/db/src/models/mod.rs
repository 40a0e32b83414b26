pub mod family;
pub mod monster;
pub mod monster_instance;
pub mod skill;
