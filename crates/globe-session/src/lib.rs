//! Session assembly: dataset loading, crossfade control, slot updates.
//!
//! All dataset fetches start concurrently and join once; synthesis begins
//! only after every fetch has completed. A fetch failure rejects the whole
//! build. The resulting [`GlobeSession`] owns the grids, the combined
//! geometry, the color bank and the blend state, and is driven from the
//! host's render loop via [`GlobeSession::apply_frame`].

pub mod crossfade;
pub mod error;
pub mod fetch;
pub mod session;

pub use crossfade::{CrossfadeController, CROSSFADE_DURATION};
pub use error::{Result, SessionError};
pub use fetch::{HttpFetcher, SourceFetcher};
pub use session::{load_and_build, DatasetEntry, FrameOutcome, GlobeSession};
