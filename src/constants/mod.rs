pub mod common;

pub use common::{
    CONFIG_FILE_NAME, DEFAULT_HOOK_TIMEOUT_SECS, DEFAULT_IGNORE_PATTERNS,
    DEFAULT_LIST_TIMEOUT_SECS, DEFAULT_MAX_PARALLEL_LISTING, DEFAULT_OPERATION_TIMEOUT_SECS,
    DOTFILES_DIR_NAME, LOCK_FILE_NAME, LOCK_FILE_VERSION, MANAGERS_FILE_NAME, PROJECT_NAME,
    PROJECT_ORG, PROJECT_QUALIFIER, TEMPLATE_SUFFIX,
};
