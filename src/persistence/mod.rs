pub mod blob;
pub mod files;
pub mod settings;

pub use blob::{BlobStore, FileBlobStore};
pub use files::{atomic_write, ensure_dir, get_data_dir, init_local_dir, read_file};
pub use settings::{load_settings, save_settings, settings_file, Settings};
