//! dotstyle - Back up desktop style configuration per OS.
//!
//! Copies application config folders into a dotfiles tree and records
//! provenance metadata for config folders, GTK themes, icon themes and
//! fonts under `configs/<os-id>/`.

pub mod backup;
pub mod config;
pub mod layout;
pub mod metadata;
pub mod os_release;

// Re-export main types
pub use backup::{BackupItem, BackupReport, Sources, StyleBackup};
pub use config::Config;
pub use layout::Layout;
pub use metadata::{Category, MetadataRecord, MetadataStore, SourceKind};
pub use os_release::OsIdentity;
