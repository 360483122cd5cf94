pub mod csv_import;
pub mod draft_store;
pub mod editor_session;
pub mod eval_jobs;
pub mod readiness;

pub use csv_import::{ImportError, import_csv};
pub use draft_store::{DatasetDraftStore, NAME_MAX_LEN};
pub use editor_session::EditorSession;
pub use eval_jobs::EvalJobService;
pub use readiness::check_complete;
