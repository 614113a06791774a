pub mod certifier;
pub mod debounce;
pub mod session;
pub mod state;

pub use certifier::{Certifier, DEFAULT_REVIEW_TIMEOUT, ReviewOutcome};
pub use debounce::{DEFAULT_SETTLE_WINDOW, DebouncedValidation, spawn_debounced_validation};
pub use session::Session;
pub use state::{CertificationMachine, CertificationState, CertificationStatus, Phase};
