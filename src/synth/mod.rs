//! Modal-synthesis-driven impact and scrape audio generation.

pub mod impact;
pub mod scrape;

pub use impact::synth_impact;
pub use scrape::{ScrapeState, ScrapeStep};
