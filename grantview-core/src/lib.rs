pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod item;
pub mod merger;
pub mod mutator;
pub mod presenter;
pub mod session;
pub mod store;
pub mod transport;

pub use auth::{AuthProvider, XsrfTokenProvider};
pub use codec::{decode, encode, Envelope};
pub use config::{SourceRefs, WidgetConfig};
pub use error::{AuthError, CodecError, ConfigError, PersistError, TransportError};
pub use fetcher::{fetch, fetch_sources, Sources};
pub use item::{CatalogEntry, GrantEntry, ItemId, VisibleItem};
pub use merger::merge;
pub use mutator::{Mutator, PersistOutcome, PersistReport, ReportSink};
pub use presenter::{present, ConsumeHandle, ConsumeRequest, Presenter, WeakConsumeHandle};
pub use session::{spawn_session, SessionHandle, WidgetSession};
pub use store::{shared_store, GrantStore, SharedStore};
pub use transport::{AuthToken, HttpTransport, Transport};
