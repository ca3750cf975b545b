// Security module for path validation and access control
//
// Tools that touch the filesystem resolve every user-supplied path through
// the sandbox so they stay within the configured root directory.

pub mod path_validator;

pub use path_validator::{PathSandbox, PathSecurityError};
