pub mod status;
pub mod timeline;

pub use status::{build_pod_detail, build_status_view};
pub use timeline::build_timeline;
