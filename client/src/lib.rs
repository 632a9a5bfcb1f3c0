//! Client-side glue for the Inflynced puzzle miniapp: leaderboard
//! submission/fetch with a local-storage fallback tier, the profile/context
//! resolver, device-local JSON storage, share-text composition, and the
//! on-chain leaderboard ABI scaffolding.

pub mod chain;
pub mod leaderboard;
pub mod profile;
pub mod share;
pub mod storage;

pub use leaderboard::{LeaderboardClient, Standings, SubmitOutcome, SubmitReceipt, Tier};
pub use profile::{
    ActiveProfile, EnvContext, HostContext, HostUnavailable, HostUser, ProfileError,
    ProfileResolver, ProfileSource, Resolution, UserProfile,
};
pub use storage::{JsonFileStore, ProfileStore, SnapshotStore, StorageError};
