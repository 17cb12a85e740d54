pub mod narnet;

pub use narnet::{Gradients, NarNetwork, Updater};
