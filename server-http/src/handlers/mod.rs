pub mod health;
pub mod images;
pub mod placeholder;

pub use health::health_check;
pub use images::{get_images, images_preflight};
pub use placeholder::get_placeholder_images;
