pub mod error;
pub mod pipeline;

pub use tablematch_app as app;
pub use tablematch_domain as domain;
pub use tablematch_infra as infra;
