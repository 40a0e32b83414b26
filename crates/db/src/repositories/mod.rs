pub mod family_repo;
pub mod monster_instance_repo;
pub mod monster_repo;
pub mod skill_repo;

pub use family_repo::FamilyRepo;
pub use monster_instance_repo::MonsterInstanceRepo;
pub use monster_repo::MonsterRepo;
pub use skill_repo::SkillRepo;

use bestiary_core::error::CoreError;

/// Error type for repository operations that can fail on domain rules
/// (missing references, blocked deletes) as well as on the database.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
