pub mod display;

pub use display::{DisplayKind, DisplayRecord, NO_RESULTS_MESSAGE, ResultsView};
