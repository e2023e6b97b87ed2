//! Domain types for the screening engine.
//!
//! All models are strongly typed with absence explicitly representable:
//! a missing financial field is `None`, never a zero sentinel.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase-normalized ticker symbol |
//! | [`StockSnapshot`] | Company/market facts for one ticker, all fields optional |
//! | [`RiskFlag`] / [`RiskReport`] | Classified, severity-tagged screening output |
//! | [`AdrVerdict`] | Tri-state ADR determination from a single source |
//! | [`BatchResult`] | Per-ticker batch outcome (snapshot+report or error) |
//! | [`ScreenReport`] | Bundle handed to the presentation layer |

mod adr;
mod batch;
mod risk;
mod snapshot;
mod ticker;

pub use adr::AdrVerdict;
pub use batch::{BatchResult, ScreenReport};
pub use risk::{RiskCategory, RiskFlag, RiskReport, RiskSeverity};
pub use snapshot::StockSnapshot;
pub use ticker::Ticker;
