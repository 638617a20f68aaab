pub mod deadline;
pub mod json;
pub mod retry;
pub mod url;

pub use deadline::with_deadline;
pub use json::{parse_json_response, strip_code_fences};
pub use retry::{with_retry, RetryPolicy};
pub use url::{is_image_url, is_web_url, normalize_url, resolve_image_url};
