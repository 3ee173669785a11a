//! Product Wizard Common Library
//!
//! CLIとWeb(WASM)で共有される商品登録フォームの状態・検証・下書き

pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod fields;
pub mod images;
pub mod interaction;
pub mod preview;
pub mod session;
pub mod sku;
pub mod state;
pub mod submission;
pub mod tags;
pub mod validation;
pub mod variants;
pub mod wizard;

pub use config::{Catalog, FormConfig, SelectOption};
pub use draft::{Draft, DraftSlot, DraftStore, MemorySlot, SaveStatus};
pub use editor::{MarkupEditor, RichTextEditor};
pub use error::{CollectionError, Error, Result};
pub use fields::ProductFields;
pub use images::{ImagePayload, ImageSet};
pub use interaction::{ConfirmDialog, NavigationIntent, Notifier, Severity, SubmissionTransport};
pub use preview::{Gallery, PreviewModel};
pub use session::{FormSession, Navigation};
pub use state::FormState;
pub use submission::{SubmissionError, SubmissionPayload};
pub use tags::TagCollection;
pub use validation::{Step, ValidationResult};
pub use variants::{VariantId, VariantSet};
pub use wizard::WizardController;
