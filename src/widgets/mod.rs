mod crop_handles;

pub use crop_handles::{CropHandles, Corner};
